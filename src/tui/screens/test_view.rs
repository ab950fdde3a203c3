//! Single patient-test detail: full record view, report upload

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::ApiClient;
use crate::models::{fmt_currency, fmt_date, or_missing, paid_badge, person_name, PatientTest};
use crate::request::{Mutation, Query, QueryOptions, RequestStatus};
use crate::tui::components::StatusDisplay;
use crate::tui::modals::{UploadAction, UploadForm};
use crate::tui::screens::tests::read_attachment;
use crate::tui::screens::ScreenEvent;
use crate::tui::ui::Styles;

pub struct TestViewScreen {
    client: ApiClient,
    options: QueryOptions,
    test_id: String,
    query: Query<PatientTest>,
    upload_form: Option<UploadForm>,
    upload: Mutation<()>,
    scroll: u16,
}

impl TestViewScreen {
    pub fn new(client: ApiClient, options: QueryOptions, test_id: String) -> Self {
        Self {
            client,
            options,
            test_id,
            query: Query::new("patient-test-detail"),
            upload_form: None,
            upload: Mutation::new("upload-report"),
            scroll: 0,
        }
    }

    pub fn refresh(&mut self) {
        let client = self.client.clone();
        let id = self.test_id.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            let id = id.clone();
            async move { client.get_patient_test(&id).await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();

        if let Some(result) = self.upload.take_result() {
            match result {
                Ok(()) => {
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

    fn open_upload_form(&mut self) {
        let label = self
            .query
            .data()
            .map(|test| or_missing(test.test_name.as_deref()))
            .unwrap_or_else(|| self.test_id.clone());
        self.upload_form = Some(UploadForm::new(&self.test_id, &label));
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

        match key.code {
            KeyCode::Esc => Some(ScreenEvent::Back),
            KeyCode::Char('r') if self.query.status() == RequestStatus::Error => {
                self.refresh();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Char('u') if self.query.status() == RequestStatus::Success => {
                self.open_upload_form();
                None
            }
            _ => None,
        }
    }

    fn detail_lines(test: &PatientTest) -> Vec<Line<'static>> {
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<16}"), Styles::title()),
                Span::styled(value, Styles::default()),
            ])
        };
        vec![
            field("Test ID", test.id.clone()),
            field("Test Name", or_missing(test.test_name.as_deref())),
            field("Patient", person_name(test.patient.as_ref())),
            field("Price", fmt_currency(test.price)),
            field("Payment", paid_badge(test.paid).to_string()),
            field("Total Paid", fmt_currency(test.total_paid)),
            field("Created", fmt_date(test.created_at.as_deref())),
            field("Status", or_missing(test.status.as_deref())),
            field("Report", or_missing(test.report_status.as_deref())),
        ]
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.query.status() {
            RequestStatus::Idle | RequestStatus::Loading => {
                StatusDisplay::render_loading(f, area, "patient test");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => {
                if let Some(test) = self.query.data() {
                    let mut lines = Self::detail_lines(test);
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "u: upload report  Esc: back",
                        Styles::inactive(),
                    )));
                    let paragraph = Paragraph::new(lines)
                        .block(Block::default().borders(Borders::ALL).title("Patient Test"))
                        .scroll((self.scroll, 0));
                    f.render_widget(paragraph, area);
                }
                if let Some(ref mut form) = self.upload_form {
                    form.render(f, area);
                }
            }
        }
    }
}
