//! Doctor directory, read only

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiClient;
use crate::models::{fmt_currency, or_missing, Doctor};
use crate::request::{Query, QueryOptions, RequestStatus};
use crate::tui::components::{Column, RecordTable, StatusDisplay, TableActions};
use crate::tui::screens::ScreenEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorRow {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub fee: String,
    pub email: String,
    pub phone: String,
}

impl From<&Doctor> for DoctorRow {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialization: or_missing(doctor.specialization.as_deref()),
            fee: fmt_currency(doctor.consultation_fee),
            email: or_missing(doctor.email.as_deref()),
            phone: or_missing(doctor.phone.as_deref()),
        }
    }
}

fn doctor_columns() -> Vec<Column<DoctorRow>> {
    vec![
        Column::new("name", "Name", |r: &DoctorRow| r.name.clone()),
        Column::new("specialization", "Specialization", |r: &DoctorRow| {
            r.specialization.clone()
        }),
        Column::new("fee", "Fee", |r: &DoctorRow| r.fee.clone()),
        Column::new("email", "Email", |r: &DoctorRow| r.email.clone()),
        Column::new("phone", "Phone", |r: &DoctorRow| r.phone.clone()),
    ]
}

pub struct DoctorsScreen {
    client: ApiClient,
    options: QueryOptions,
    query: Query<Vec<Doctor>>,
    synced: bool,
    table: RecordTable<DoctorRow>,
}

impl DoctorsScreen {
    pub fn new(client: ApiClient, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            query: Query::new("doctors"),
            synced: false,
            table: RecordTable::new(
                "Doctors",
                "directory updates happen on the server",
                doctor_columns(),
                TableActions::none(),
            ),
        }
    }

    pub fn refresh(&mut self) {
        self.synced = false;
        let client = self.client.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            async move { client.list_doctors().await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();
        if self.query.status() == RequestStatus::Success && !self.synced {
            if let Some(doctors) = self.query.data() {
                self.table.set_rows(doctors.iter().map(DoctorRow::from).collect());
                self.synced = true;
            }
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        match key.code {
            KeyCode::Esc => Some(ScreenEvent::Back),
            KeyCode::Char('r') if self.query.status() == RequestStatus::Error => {
                self.refresh();
                None
            }
            _ => {
                self.table.handle_key(key.code);
                None
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.query.status() {
            RequestStatus::Idle | RequestStatus::Loading => {
                StatusDisplay::render_loading(f, area, "doctors");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => self.table.render(f, area),
        }
    }
}
