//! Registered patient list, read only

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiClient;
use crate::models::{or_missing, Patient, MISSING};
use crate::request::{Query, QueryOptions, RequestStatus};
use crate::tui::components::{Column, RecordTable, StatusDisplay, TableActions};
use crate::tui::screens::ScreenEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
}

impl From<&Patient> for PatientRow {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            email: or_missing(patient.email.as_deref()),
            phone: or_missing(patient.phone.as_deref()),
            age: patient
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            gender: or_missing(patient.gender.as_deref()),
        }
    }
}

fn patient_columns() -> Vec<Column<PatientRow>> {
    vec![
        Column::new("name", "Name", |r: &PatientRow| r.name.clone()),
        Column::new("email", "Email", |r: &PatientRow| r.email.clone()),
        Column::new("phone", "Phone", |r: &PatientRow| r.phone.clone()),
        Column::new("age", "Age", |r: &PatientRow| r.age.clone()),
        Column::new("gender", "Gender", |r: &PatientRow| r.gender.clone()),
    ]
}

pub struct PatientsScreen {
    client: ApiClient,
    options: QueryOptions,
    query: Query<Vec<Patient>>,
    synced: bool,
    table: RecordTable<PatientRow>,
}

impl PatientsScreen {
    pub fn new(client: ApiClient, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            query: Query::new("patients"),
            synced: false,
            table: RecordTable::new(
                "Patients",
                "patients register through the booking flow",
                patient_columns(),
                TableActions::none(),
            ),
        }
    }

    pub fn refresh(&mut self) {
        self.synced = false;
        let client = self.client.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            async move { client.list_patients().await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();
        if self.query.status() == RequestStatus::Success && !self.synced {
            if let Some(patients) = self.query.data() {
                self.table.set_rows(patients.iter().map(PatientRow::from).collect());
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
                StatusDisplay::render_loading(f, area, "patients");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_renders_age_and_gaps() {
        let patient: Patient = serde_json::from_value(
            serde_json::json!({ "_id": "p1", "name": "Jane", "age": 34 }),
        )
        .unwrap();
        let row = PatientRow::from(&patient);
        assert_eq!(row.age, "34");
        assert_eq!(row.gender, "N/A");
        assert_eq!(row.email, "N/A");
    }
}
