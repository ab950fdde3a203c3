//! Patient test queue: list ordered tests, upload result reports

use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiClient;
use crate::models::{
    fmt_currency, fmt_date, or_missing, paid_badge, person_name, Attachment, PatientTest,
};
use crate::request::{Mutation, Query, QueryOptions, RequestStatus};
use crate::tui::components::{Column, RecordTable, StatusDisplay, TableActions, TableEvent};
use crate::tui::modals::{UploadAction, UploadForm};
use crate::tui::screens::ScreenEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct PatientTestRow {
    pub id: String,
    pub test_name: String,
    pub patient_name: String,
    pub price: String,
    pub payment: String,
    pub total_paid: String,
    pub created: String,
    pub status: String,
    pub report_status: String,
}

impl From<&PatientTest> for PatientTestRow {
    fn from(test: &PatientTest) -> Self {
        Self {
            id: test.id.clone(),
            test_name: or_missing(test.test_name.as_deref()),
            patient_name: person_name(test.patient.as_ref()),
            price: fmt_currency(test.price),
            payment: paid_badge(test.paid).to_string(),
            total_paid: fmt_currency(test.total_paid),
            created: fmt_date(test.created_at.as_deref()),
            status: or_missing(test.status.as_deref()),
            report_status: or_missing(test.report_status.as_deref()),
        }
    }
}

fn patient_test_columns() -> Vec<Column<PatientTestRow>> {
    vec![
        Column::new("test", "Test", |r: &PatientTestRow| r.test_name.clone()),
        Column::new("patient", "Patient", |r: &PatientTestRow| r.patient_name.clone()),
        Column::new("price", "Price", |r: &PatientTestRow| r.price.clone()),
        Column::new("payment", "Payment", |r: &PatientTestRow| r.payment.clone()),
        Column::new("total_paid", "Total Paid", |r: &PatientTestRow| r.total_paid.clone()),
        Column::new("created", "Created", |r: &PatientTestRow| r.created.clone()),
        Column::new("status", "Status", |r: &PatientTestRow| r.status.clone()),
        Column::new("report", "Report", |r: &PatientTestRow| r.report_status.clone()),
    ]
}

pub(crate) fn read_attachment(path: &str) -> Result<Attachment, String> {
    let bytes = fs::read(path).map_err(|e| format!("Cannot read {path}: {e}"))?;
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(Attachment { file_name, bytes })
}

pub struct TestsScreen {
    client: ApiClient,
    options: QueryOptions,
    query: Query<Vec<PatientTest>>,
    synced: bool,
    table: RecordTable<PatientTestRow>,
    upload_form: Option<UploadForm>,
    upload: Mutation<()>,
}

impl TestsScreen {
    pub fn new(client: ApiClient, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            query: Query::new("patient-tests"),
            synced: false,
            table: RecordTable::new(
                "Patient Tests",
                "tests are ordered from the appointment flow",
                patient_test_columns(),
                TableActions::none().with_view().with_report(),
            ),
            upload_form: None,
            upload: Mutation::new("upload-report"),
        }
    }

    pub fn refresh(&mut self) {
        self.synced = false;
        let client = self.client.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            async move { client.list_patient_tests().await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();
        if self.query.status() == RequestStatus::Success && !self.synced {
            if let Some(tests) = self.query.data() {
                self.table.set_rows(tests.iter().map(PatientTestRow::from).collect());
                self.synced = true;
            }
        }

        if let Some(result) = self.upload.take_result() {
            match result {
                Ok(()) => {
                    if let Some(ref mut form) = self.upload_form {
                        form.clear();
                    }
                    self.upload_form = None;
                    self.refresh();
                    return Some(ScreenEvent::Status("Report uploaded".to_string()));
                }
                Err(info) => {
                    if let Some(ref mut form) = self.upload_form {
                        form.set_submit_error(info.message);
                    }
                }
            }
        }

        None
    }

    pub fn is_editing(&self) -> bool {
        self.upload_form.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        if let Some(ref mut form) = self.upload_form {
            match form.handle_key(key) {
                Some(UploadAction::Cancel) => self.upload_form = None,
                Some(UploadAction::AddFile(path)) => match read_attachment(&path) {
                    Ok(attachment) => {
                        if let Some(ref mut form) = self.upload_form {
                            form.add_attachment(attachment);
                            form.clear_file_path();
                        }
                    }
                    Err(message) => {
                        if let Some(ref mut form) = self.upload_form {
                            form.set_submit_error(message);
                        }
                    }
                },
                Some(UploadAction::Submit(payload)) => {
                    if let Some(ref mut form) = self.upload_form {
                        form.uploading = true;
                    }
                    let client = self.client.clone();
                    self.upload.start(async move { client.upload_report(&payload).await });
                }
                None => {}
            }
            return None;
        }

        match self.query.status() {
            RequestStatus::Error => match key.code {
                KeyCode::Char('r') => {
                    self.refresh();
                    None
                }
                KeyCode::Esc => Some(ScreenEvent::Back),
                _ => None,
            },
            RequestStatus::Success => {
                if key.code == KeyCode::Esc {
                    return Some(ScreenEvent::Back);
                }
                match self.table.handle_key(key.code) {
                    Some(TableEvent::View(i)) => self
                        .table
                        .rows()
                        .get(i)
                        .map(|row| ScreenEvent::OpenTest(row.id.clone())),
                    Some(TableEvent::Report(i)) => {
                        if let Some(row) = self.table.rows().get(i) {
                            let label = format!("{} / {}", row.test_name, row.patient_name);
                            self.upload_form = Some(UploadForm::new(&row.id, &label));
                        }
                        None
                    }
                    _ => None,
                }
            }
            _ => match key.code {
                KeyCode::Esc => Some(ScreenEvent::Back),
                _ => None,
            },
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.query.status() {
            RequestStatus::Idle | RequestStatus::Loading => {
                StatusDisplay::render_loading(f, area, "patient tests");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => {
                self.table.render(f, area);
                if let Some(ref mut form) = self.upload_form {
                    form.render(f, area);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_projection_carries_payment_columns() {
        let raw = serde_json::json!({
            "result": [{
                "_id": "1",
                "patientId": { "name": "John" },
                "paid": true
            }]
        });
        let tests: Vec<PatientTest> = crate::api::envelope::decode(&raw.to_string()).unwrap();
        let row = PatientTestRow::from(&tests[0]);
        assert_eq!(row.patient_name, "John");
        assert_eq!(row.payment, "Paid");
        assert_eq!(row.price, "N/A");
        assert_eq!(row.total_paid, "N/A");
        assert_eq!(row.created, "N/A");
    }

    #[test]
    fn test_projection_formats_payment_fields() {
        let test: PatientTest = serde_json::from_value(serde_json::json!({
            "_id": "t2",
            "testName": "CBC",
            "price": 300.0,
            "paid": false,
            "totalPaid": 120.0,
            "createdAt": "2025-03-25T09:00:00Z"
        }))
        .unwrap();
        let row = PatientTestRow::from(&test);
        assert_eq!(row.price, "$300.00");
        assert_eq!(row.payment, "Unpaid");
        assert_eq!(row.total_paid, "$120.00");
        assert_eq!(row.created, "2025-03-25");
    }

    #[test]
    fn test_projection_degrades_null_patient() {
        let test: PatientTest = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "testName": "CBC",
            "patientId": null,
            "status": "Pending"
        }))
        .unwrap();
        let row = PatientTestRow::from(&test);
        assert_eq!(row.test_name, "CBC");
        assert_eq!(row.patient_name, "N/A");
        assert_eq!(row.report_status, "N/A");
    }

    #[test]
    fn test_read_attachment_uses_file_name_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"report body").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.bytes, b"report body");
        assert!(!attachment.file_name.contains('/'));
    }

    #[test]
    fn test_read_attachment_reports_missing_file() {
        let err = read_attachment("/no/such/report.pdf").unwrap_err();
        assert!(err.contains("/no/such/report.pdf"));
    }
}
