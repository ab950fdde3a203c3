//! Single-appointment detail: full record view, cancellation, vitals entry

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::ApiClient;
use crate::models::{
    fmt_currency, fmt_date, or_missing, paid_badge, person_name, Appointment, Vitals,
};
use crate::request::{Mutation, Query, QueryOptions, RequestStatus};
use crate::tui::components::{FieldKind, FormField, StatusDisplay};
use crate::tui::modals::{FormAction, RecordForm};
use crate::tui::screens::ScreenEvent;
use crate::tui::ui::Styles;

pub struct AppointmentViewScreen {
    client: ApiClient,
    options: QueryOptions,
    appointment_id: String,
    query: Query<Appointment>,
    vitals_form: Option<RecordForm>,
    cancel: Mutation<()>,
    vitals: Mutation<()>,
    scroll: u16,
}

impl AppointmentViewScreen {
    pub fn new(client: ApiClient, options: QueryOptions, appointment_id: String) -> Self {
        Self {
            client,
            options,
            appointment_id,
            query: Query::new("appointment-detail"),
            vitals_form: None,
            cancel: Mutation::new("cancel-appointment"),
            vitals: Mutation::new("submit-vitals"),
            scroll: 0,
        }
    }

    pub fn refresh(&mut self) {
        let client = self.client.clone();
        let id = self.appointment_id.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            let id = id.clone();
            async move { client.get_appointment(&id).await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();

        if let Some(result) = self.cancel.take_result() {
            match result {
                Ok(()) => {
                    self.refresh();
                    return Some(ScreenEvent::Status("Appointment cancelled".to_string()));
                }
                Err(info) => return Some(ScreenEvent::Error(info.message)),
            }
        }

        if let Some(result) = self.vitals.take_result() {
            match result {
                Ok(()) => {
                    self.vitals_form = None;
                    self.refresh();
                    return Some(ScreenEvent::Status("Vitals recorded".to_string()));
                }
                Err(info) => {
                    if let Some(ref mut form) = self.vitals_form {
                        form.set_submit_error(info.message);
                    }
                }
            }
        }

        None
    }

    fn open_vitals_form(&mut self) {
        self.vitals_form = Some(RecordForm::create(
            "Record Vitals",
            vec![
                FormField::new("blood_pressure", "Blood Pressure", FieldKind::Text)
                    .required()
                    .with_placeholder("120/80"),
                FormField::new("temperature", "Temperature", FieldKind::Text)
                    .required()
                    .with_placeholder("98.6 F"),
                FormField::new("pulse", "Pulse", FieldKind::Text)
                    .required()
                    .with_placeholder("72 bpm"),
                FormField::new("weight", "Weight", FieldKind::Text)
                    .required()
                    .with_placeholder("70 kg"),
            ],
        ));
    }

    fn submit_vitals(&mut self) {
        let Some(ref mut form) = self.vitals_form else { return };
        let vitals = Vitals {
            blood_pressure: form.value("blood_pressure"),
            temperature: form.value("temperature"),
            pulse: form.value("pulse"),
            weight: form.value("weight"),
        };
        form.saving = true;
        let client = self.client.clone();
        let id = self.appointment_id.clone();
        self.vitals.start(async move { client.submit_vitals(&id, &vitals).await });
    }

    pub fn is_editing(&self) -> bool {
        self.vitals_form.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        if let Some(ref mut form) = self.vitals_form {
            match form.handle_key(key) {
                Some(FormAction::Cancel) => self.vitals_form = None,
                Some(FormAction::Submit(_)) => self.submit_vitals(),
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
            KeyCode::Char('c') if self.query.status() == RequestStatus::Success => {
                if self.cancel.is_in_flight() {
                    return None;
                }
                let client = self.client.clone();
                let id = self.appointment_id.clone();
                self.cancel.start(async move { client.cancel_appointment(&id).await });
                Some(ScreenEvent::Status("Cancelling appointment...".to_string()))
            }
            KeyCode::Char('t') if self.query.status() == RequestStatus::Success => {
                self.open_vitals_form();
                None
            }
            _ => None,
        }
    }

    fn detail_lines(appointment: &Appointment) -> Vec<Line<'static>> {
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<18}"), Styles::title()),
                Span::styled(value, Styles::default()),
            ])
        };
        vec![
            field("Booking ID", appointment.id.clone()),
            field("Patient", person_name(appointment.patient.as_ref())),
            field("Doctor", person_name(appointment.doctor.as_ref())),
            field("Date", fmt_date(appointment.appointment_date.as_deref())),
            field("Time", or_missing(appointment.appointment_time.as_deref())),
            field("Status", or_missing(appointment.booking_status.as_deref())),
            field("Consultation Fee", fmt_currency(appointment.consultation_fee)),
            field("Total Amount", fmt_currency(appointment.total_amount)),
            field("Payment", paid_badge(appointment.paid).to_string()),
        ]
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.query.status() {
            RequestStatus::Idle | RequestStatus::Loading => {
                StatusDisplay::render_loading(f, area, "appointment");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => {
                if let Some(appointment) = self.query.data() {
                    let mut lines = Self::detail_lines(appointment);
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "c: cancel appointment  t: record vitals  Esc: back",
                        Styles::inactive(),
                    )));
                    let paragraph = Paragraph::new(lines)
                        .block(Block::default().borders(Borders::ALL).title("Appointment"))
                        .scroll((self.scroll, 0));
                    f.render_widget(paragraph, area);
                }
                if let Some(ref form) = self.vitals_form {
                    form.render(f, area);
                }
            }
        }
    }
}
