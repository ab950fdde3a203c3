//! Lab service catalog: list, add, edit

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::api::ApiClient;
use crate::models::{fmt_currency, or_missing, Lab, LabPayload};
use crate::request::{Mutation, Query, QueryOptions, RequestStatus};
use crate::tui::components::{
    Column, FieldKind, FormField, RecordTable, StatusDisplay, TableActions, TableEvent,
};
use crate::tui::modals::{FormAction, FormSubmit, RecordForm};
use crate::tui::screens::ScreenEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct LabRow {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
}

impl From<&Lab> for LabRow {
    fn from(lab: &Lab) -> Self {
        Self {
            id: lab.id.clone(),
            name: lab.name.clone(),
            price: fmt_currency(lab.price),
            description: or_missing(lab.description.as_deref()),
        }
    }
}

fn lab_columns() -> Vec<Column<LabRow>> {
    vec![
        Column::new("name", "Test Name", |r: &LabRow| r.name.clone()),
        Column::new("price", "Price", |r: &LabRow| r.price.clone()),
        Column::new("description", "Description", |r: &LabRow| r.description.clone()),
    ]
}

pub struct LabsScreen {
    client: ApiClient,
    options: QueryOptions,
    query: Query<Vec<Lab>>,
    synced: bool,
    table: RecordTable<LabRow>,
    form: Option<RecordForm>,
    save: Mutation<Lab>,
}

impl LabsScreen {
    pub fn new(client: ApiClient, options: QueryOptions) -> Self {
        Self {
            client,
            options,
            query: Query::new("labs"),
            synced: false,
            table: RecordTable::new(
                "Lab Tests",
                "add a lab test",
                lab_columns(),
                TableActions::none().with_add_new().with_edit(),
            ),
            form: None,
            save: Mutation::new("save-lab"),
        }
    }

    pub fn refresh(&mut self) {
        self.synced = false;
        let client = self.client.clone();
        self.query.run(self.options, move || {
            let client = client.clone();
            async move { client.list_labs().await }
        });
    }

    pub fn poll(&mut self) -> Option<ScreenEvent> {
        self.query.poll();
        if self.query.status() == RequestStatus::Success && !self.synced {
            if let Some(labs) = self.query.data() {
                self.table.set_rows(labs.iter().map(LabRow::from).collect());
                self.synced = true;
            }
        }

        if let Some(result) = self.save.take_result() {
            match result {
                Ok(_) => {
                    self.form = None;
                    self.refresh();
                    return Some(ScreenEvent::Status("Lab test saved".to_string()));
                }
                Err(info) => {
                    if let Some(ref mut form) = self.form {
                        form.set_submit_error(info.message);
                    }
                }
            }
        }

        None
    }

    fn lab_fields(seed: Option<&LabRow>) -> Vec<FormField> {
        let mut name = FormField::new("name", "Test Name", FieldKind::Text).required();
        let mut price = FormField::new("price", "Price", FieldKind::Price)
            .required()
            .with_placeholder("300");
        let mut description = FormField::new("description", "Description", FieldKind::Text);
        if let Some(row) = seed {
            name = name.with_value(&row.name);
            price = price.with_value(row.price.trim_start_matches('$'));
            if row.description != crate::models::MISSING {
                description = description.with_value(&row.description);
            }
        }
        vec![name, price, description]
    }

    fn open_form(&mut self, seed: Option<usize>) {
        self.form = Some(match seed.and_then(|i| self.table.rows().get(i)) {
            Some(row) => {
                let fields = Self::lab_fields(Some(row));
                RecordForm::edit("Edit Lab Test", &row.id, fields)
            }
            None => RecordForm::create("Add Lab Test", Self::lab_fields(None)),
        });
    }

    fn submit(&mut self, target: FormSubmit) {
        let Some(ref mut form) = self.form else { return };
        let price: f64 = match form.value("price").parse() {
            Ok(p) => p,
            Err(_) => {
                form.set_submit_error("Price must be a number".to_string());
                return;
            }
        };
        let payload = LabPayload {
            name: form.value("name"),
            price,
            description: form.optional_value("description"),
        };
        form.saving = true;
        let client = self.client.clone();
        self.save.start(async move {
            match target {
                FormSubmit::Create => client.add_lab(&payload).await,
                FormSubmit::Update(id) => client.update_lab(&id, &payload).await,
            }
        });
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        if let Some(ref mut form) = self.form {
            match form.handle_key(key) {
                Some(FormAction::Cancel) => self.form = None,
                Some(FormAction::Submit(target)) => self.submit(target),
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
                    Some(TableEvent::AddNew) => {
                        self.open_form(None);
                        None
                    }
                    Some(TableEvent::Edit(i)) => {
                        self.open_form(Some(i));
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
                StatusDisplay::render_loading(f, area, "lab tests");
            }
            RequestStatus::Error => {
                let info = self.query.error().cloned();
                if let Some(info) = info {
                    StatusDisplay::render_error(f, area, &info.message, info.retryable);
                }
            }
            RequestStatus::Success => {
                self.table.render(f, area);
                if let Some(ref form) = self.form {
                    form.render(f, area);
                }
            }
        }
    }
}
