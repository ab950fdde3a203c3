//! Appointments page: list, booking, cancellation

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiClient;
use crate::models::{
    fmt_currency, fmt_date, or_missing, paid_badge, person_name, Appointment, BookingRequest,
    Doctor,
};
use crate::request::{Mutation, Query, QueryOptions, RequestStatus};
use crate::tui::components::{
    Column, FieldKind, FormField, RecordTable, StatusDisplay, TableActions, TableEvent,
};
use crate::tui::modals::{FormAction, FormSubmit, RecordForm};
use crate::tui::screens::ScreenEvent;

/// Projected table row for one appointment
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRow {
    pub id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub fee: String,
    pub total: String,
    pub payment: &'static str,
}

impl From<&Appointment> for AppointmentRow {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.clone(),
            patient_name: person_name(appointment.patient.as_ref()),
            doctor_name: person_name(appointment.doctor.as_ref()),
            date: fmt_date(appointment.appointment_date.as_deref()),
            time: or_missing(appointment.appointment_time.as_deref()),
            status: or_missing(appointment.booking_status.as_deref()),
            fee: fmt_currency(appointment.consultation_fee),
            total: fmt_currency(appointment.total_amount),
            payment: paid_badge(appointment.paid),
        }
    }
}

fn appointment_columns() -> Vec<Column<AppointmentRow>> {
    vec![
        Column::new("id", "Booking ID", |r: &AppointmentRow| r.id.clone()),
        Column::new("patient", "Patient", |r: &AppointmentRow| r.patient_name.clone()),
        Column::new("doctor", "Doctor", |r: &AppointmentRow| r.doctor_name.clone()),
        Column::new("date", "Date", |r: &AppointmentRow| r.date.clone()),
        Column::new("time", "Time", |r: &AppointmentRow| r.time.clone()),
        Column::new("status", "Status", |r: &AppointmentRow| r.status.clone()),
        Column::new("fee", "Fee", |r: &AppointmentRow| r.fee.clone()),
        Column::new("total", "Total", |r: &AppointmentRow| r.total.clone()),
        Column::new("payment", "Payment", |r: &AppointmentRow| r.payment.to_string()),
    ]
}

pub struct AppointmentsScreen {
    client: ApiClient,
    options: QueryOptions,
    query: Query<Vec<Appointment>>,
    synced: bool,
    doctors: Query<Vec<Doctor>>,
    table: RecordTable<AppointmentRow>,
    booking_form: Option<RecordForm>,
    book: Mutation<Appointment>,
    cancel: Mutation<()>,
}

impl AppointmentsScreen {
    pub fn new(client: ApiClient, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            query: Query::new("appointments"),
            synced: false,
            doctors: Query::new("doctors-for-booking"),
            table: RecordTable::new(
                "Appointments",
                "book a new appointment",
                appointment_columns(),
                TableActions::none()
                    .with_add_new()
                    .with_view()
                    .with_delete()
                    .with_row_select(),
            ),
            booking_form: None,
            book: Mutation::new("book-appointment"),
            cancel: Mutation::new("cancel-appointment"),
        }
    }

    /// Fetch (or refetch) the appointment list and the booking doctor list
    pub fn refresh(&mut self) {
        self.synced = false;
        let client = self.client.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            async move { client.list_appointments().await }
        });
        let client = self.client.clone();
        self.doctors.run(self.options, move || {
            let client = client.clone();
            async move { client.list_doctors().await }
        });
    }

    /// Apply settled queries and mutation results; one call per tick
    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();
        self.doctors.poll();

        if self.query.status() == RequestStatus::Success && !self.synced {
            if let Some(appointments) = self.query.data() {
                let rows = appointments.iter().map(AppointmentRow::from).collect();
                self.table.set_rows(rows);
                self.synced = true;
            }
        }

        if let Some(result) = self.book.take_result() {
            match result {
                Ok(_) => {
                    self.booking_form = None;
                    self.refresh();
                    return Some(ScreenEvent::Status("Appointment booked".to_string()));
                }
                Err(info) => {
                    if let Some(ref mut form) = self.booking_form {
                        form.set_submit_error(info.message);
                    }
                }
            }
        }

        if let Some(result) = self.cancel.take_result() {
            match result {
                Ok(()) => {
                    self.refresh();
                    return Some(ScreenEvent::Status("Appointment cancelled".to_string()));
                }
                Err(info) => return Some(ScreenEvent::Error(info.message)),
            }
        }

        None
    }

    fn open_booking_form(&mut self) -> Option<ScreenEvent> {
        let doctor_names: Vec<String> = self
            .doctors
            .data()
            .map(|doctors| doctors.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default();
        if doctor_names.is_empty() {
            return Some(ScreenEvent::Error(
                "Doctor list is not available yet".to_string(),
            ));
        }

        self.booking_form = Some(RecordForm::create(
            "Book New Appointment",
            vec![
                FormField::new("patient_name", "Patient Name", FieldKind::Text).required(),
                FormField::new("email", "Patient Email", FieldKind::Email).required(),
                FormField::new("phone", "Patient Phone", FieldKind::Phone).required(),
                FormField::new("doctor", "Doctor", FieldKind::Select(doctor_names)),
                FormField::new("date", "Date", FieldKind::Date)
                    .required()
                    .with_placeholder("YYYY-MM-DD"),
                FormField::new("time", "Time", FieldKind::Text)
                    .required()
                    .with_placeholder("09:00 AM"),
            ],
        ));
        None
    }

    fn submit_booking(&mut self) {
        let Some(ref mut form) = self.booking_form else { return };

        let doctor_name = form.value("doctor");
        let doctor_id = self
            .doctors
            .data()
            .and_then(|doctors| doctors.iter().find(|d| d.name == doctor_name))
            .map(|d| d.id.clone());
        let Some(doctor_id) = doctor_id else {
            form.set_submit_error("Select a doctor".to_string());
            return;
        };

        let booking = BookingRequest {
            patient_name: form.value("patient_name"),
            patient_email: form.value("email"),
            patient_phone: form.value("phone"),
            doctor_id,
            appointment_date: form.value("date"),
            appointment_time: form.value("time"),
        };

        form.saving = true;
        let client = self.client.clone();
        self.book.start(async move { client.book_appointment(&booking).await });
    }

    pub fn is_editing(&self) -> bool {
        self.booking_form.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        if let Some(ref mut form) = self.booking_form {
            let action = form.handle_key(key);
            match action {
                Some(FormAction::Cancel) => {
                    self.booking_form = None;
                }
                Some(FormAction::Submit(FormSubmit::Create)) => self.submit_booking(),
                Some(FormAction::Submit(FormSubmit::Update(_))) | None => {}
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
                    Some(TableEvent::AddNew) => self.open_booking_form(),
                    Some(TableEvent::View(i)) => self
                        .table
                        .rows()
                        .get(i)
                        .map(|row| ScreenEvent::OpenAppointment(row.id.clone())),
                    Some(TableEvent::Delete(i)) => {
                        if self.cancel.is_in_flight() {
                            return None;
                        }
                        let id = self.table.rows().get(i)?.id.clone();
                        let client = self.client.clone();
                        self.cancel.start(async move { client.cancel_appointment(&id).await });
                        Some(ScreenEvent::Status("Cancelling appointment...".to_string()))
                    }
                    // selection changes only move the highlight
                    Some(TableEvent::Selected(_)) => None,
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
                StatusDisplay::render_loading(f, area, "appointments");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => {
                self.table.render(f, area);
                if let Some(ref form) = self.booking_form {
                    form.render(f, area);
                }
            }
        }
    }
}
