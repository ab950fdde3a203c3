//! Modal editors layered over the page content

pub mod record_form;
pub mod upload_form;

pub use record_form::{FormAction, FormSubmit, RecordForm};
pub use upload_form::{UploadAction, UploadForm};
