//! Generic add/edit modal
//!
//! One controlled form drives every create-or-update dialog (labs, test
//! catalog entries, appointment booking, vitals). Whether submit means
//! create or update is decided by the presence of a seed record id. A
//! failed write leaves the form open with all input intact.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::components::{FieldKind, FieldSet, FormField};
use crate::tui::ui::{centered_rect, Styles};

/// What a valid submit means; values are read back off the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmit {
    Create,
    Update(String),
}

/// Outcome of one key press while the modal is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Cancel,
    Submit(FormSubmit),
}

pub struct RecordForm {
    pub title: String,
    seed_id: Option<String>,
    pub fields: FieldSet,
    pub submit_error: Option<String>,
    pub saving: bool,
}

impl RecordForm {
    /// Blank form; submit yields [`FormSubmit::Create`]
    pub fn create(title: &str, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            seed_id: None,
            fields: FieldSet::new(fields),
            submit_error: None,
            saving: false,
        }
    }

    /// Form pre-populated from an existing record; submit yields
    /// [`FormSubmit::Update`] with its id
    pub fn edit(title: &str, id: &str, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            seed_id: Some(id.to_string()),
            fields: FieldSet::new(fields),
            submit_error: None,
            saving: false,
        }
    }

    pub fn value(&self, name: &str) -> String {
        self.fields.value_of(name)
    }

    /// Optional value: empty input becomes `None`
    pub fn optional_value(&self, name: &str) -> Option<String> {
        let value = self.fields.value_of(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Record a write failure; input stays intact for correction
    pub fn set_submit_error(&mut self, message: String) {
        self.saving = false;
        self.submit_error = Some(message);
    }

    /// Validate and, if clean, say what the caller should do.
    /// Returns `None` (with a visible message) when validation fails;
    /// nothing may be sent to the server in that case.
    pub fn submit(&mut self) -> Option<FormSubmit> {
        if !self.fields.validate_all() {
            self.submit_error = self.fields.first_error();
            return None;
        }
        self.submit_error = None;
        Some(match &self.seed_id {
            Some(id) => FormSubmit::Update(id.clone()),
            None => FormSubmit::Create,
        })
    }

    /// Handle a key while the modal is open; consumes every key
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        if self.saving {
            // Writes are single-shot; ignore input until the result lands
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(FormAction::Cancel),
            KeyCode::Enter => self.submit().map(FormAction::Submit),
            KeyCode::Tab | KeyCode::Down => {
                self.fields.next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.fields.previous_field();
                None
            }
            KeyCode::Left => {
                if let Some(field) = self.fields.current_field_mut() {
                    match field.kind {
                        FieldKind::Select(_) => field.cycle_prev(),
                        _ => field.move_cursor_left(),
                    }
                }
                None
            }
            KeyCode::Right => {
                if let Some(field) = self.fields.current_field_mut() {
                    match field.kind {
                        FieldKind::Select(_) => field.cycle_next(),
                        _ => field.move_cursor_right(),
                    }
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.current_field_mut() {
                    field.delete_char();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.current_field_mut() {
                    field.insert_char(c);
                }
                None
            }
            _ => None,
        }
    }

    /// Render as a centered popup over the page
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 70, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let mut constraints: Vec<Constraint> =
            self.fields.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(2)); // error / status line
        constraints.push(Constraint::Min(1)); // hint line

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in self.fields.fields.iter().enumerate() {
            field.render(f, chunks[i]);
        }

        let status_index = self.fields.fields.len();
        if self.saving {
            let saving = Paragraph::new("Saving...").style(Styles::warning());
            f.render_widget(saving, chunks[status_index]);
        } else if let Some(ref error) = self.submit_error {
            let error_line = Paragraph::new(error.clone()).style(Styles::error());
            f.render_widget(error_line, chunks[status_index]);
        }

        let hint = Paragraph::new("Tab: next field | Enter: save | Esc: cancel")
            .style(Styles::inactive());
        f.render_widget(hint, chunks[status_index + 1]);
    }
}
