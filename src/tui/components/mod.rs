//! Reusable UI components shared by every screen

pub mod form_field;
pub mod record_table;
pub mod status_display;

pub use form_field::{FieldKind, FieldSet, FormField};
pub use record_table::{Column, RecordTable, TableActions, TableEvent};
pub use status_display::StatusDisplay;
