//! Report upload modal
//!
//! Accumulates attachments for one patient test before a single multipart
//! submit. File contents are read by the owning screen (the modal itself
//! performs no I/O); a submit needs a report name and at least one
//! attachment, and the form clears only after the caller reports success.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Attachment, UploadPayload};
use crate::tui::components::{FieldKind, FieldSet, FormField};
use crate::tui::ui::{centered_rect, Styles};

/// Outcome of one key press while the upload modal is open
#[derive(Debug, Clone, PartialEq)]
pub enum UploadAction {
    Cancel,
    /// User asked to attach the file at this path; the screen reads it and
    /// calls [`UploadForm::add_attachment`]
    AddFile(String),
    Submit(UploadPayload),
}

// Focus positions: the three fields, then the pending-attachment list
const FIELD_NAME: usize = 0;
const FIELD_DESCRIPTION: usize = 1;
const FIELD_FILE_PATH: usize = 2;
const FOCUS_LIST: usize = 3;

pub struct UploadForm {
    /// Id of the patient test the report belongs to
    pub target_id: String,
    /// Context line, e.g. "Test: CBC | Patient: John"
    pub target_label: String,
    pub fields: FieldSet,
    attachments: Vec<Attachment>,
    focus: usize,
    list_state: ListState,
    pub submit_error: Option<String>,
    pub uploading: bool,
}

impl UploadForm {
    pub fn new(target_id: &str, target_label: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            target_label: target_label.to_string(),
            fields: FieldSet::new(vec![
                FormField::new("name", "Report Name", FieldKind::Text).required(),
                FormField::new("description", "Report Description", FieldKind::Text),
                FormField::new("file", "File Path", FieldKind::Text)
                    .with_placeholder("path to report file, Enter to attach"),
            ]),
            attachments: Vec::new(),
            focus: FIELD_NAME,
            list_state: ListState::default(),
            submit_error: None,
            uploading: false,
        }
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Append a pending attachment (order is preserved through submit)
    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
        self.submit_error = None;
        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }
    }

    /// Remove one pending attachment by index
    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.attachments.len() {
            self.attachments.remove(index);
        }
        if self.attachments.is_empty() {
            self.list_state.select(None);
        } else if let Some(selected) = self.list_state.selected() {
            if selected >= self.attachments.len() {
                self.list_state.select(Some(self.attachments.len() - 1));
            }
        }
    }

    /// Record an upload failure; pending input and attachments stay
    pub fn set_submit_error(&mut self, message: String) {
        self.uploading = false;
        self.submit_error = Some(message);
    }

    /// Reset after the caller reports a successful upload
    pub fn clear(&mut self) {
        self.fields.clear_all();
        self.attachments.clear();
        self.list_state.select(None);
        self.submit_error = None;
        self.uploading = false;
        self.focus = FIELD_NAME;
    }

    /// Validate and assemble the payload. `None` (with a visible message)
    /// means nothing may be sent.
    pub fn submit(&mut self) -> Option<UploadPayload> {
        if !self.fields.validate_all() {
            self.submit_error = self.fields.first_error();
            return None;
        }
        if self.attachments.is_empty() {
            self.submit_error = Some("Attach at least one report file".to_string());
            return None;
        }
        self.submit_error = None;
        let description = self.fields.value_of("description");
        Some(UploadPayload {
            target_id: self.target_id.clone(),
            name: self.fields.value_of("name"),
            description: (!description.is_empty()).then_some(description),
            files: self.attachments.clone(),
        })
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
        for (i, field) in self.fields.fields.iter_mut().enumerate() {
            field.set_focus(i == focus);
        }
        if focus == FOCUS_LIST && self.list_state.selected().is_none() && !self.attachments.is_empty()
        {
            self.list_state.select(Some(0));
        }
    }

    fn next_focus(&mut self) {
        // The list zone is skipped while it has nothing to select
        let last = if self.attachments.is_empty() {
            FIELD_FILE_PATH
        } else {
            FOCUS_LIST
        };
        let next = if self.focus >= last { FIELD_NAME } else { self.focus + 1 };
        self.set_focus(next);
    }

    fn previous_focus(&mut self) {
        let last = if self.attachments.is_empty() {
            FIELD_FILE_PATH
        } else {
            FOCUS_LIST
        };
        let prev = if self.focus == FIELD_NAME { last } else { self.focus - 1 };
        self.set_focus(prev);
    }

    /// Handle a key while the modal is open; consumes every key
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UploadAction> {
        if self.uploading {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(UploadAction::Cancel),
            KeyCode::Tab => {
                self.next_focus();
                None
            }
            KeyCode::BackTab => {
                self.previous_focus();
                None
            }
            KeyCode::Enter => match self.focus {
                FIELD_FILE_PATH => {
                    let path = self.fields.value_of("file");
                    if path.is_empty() {
                        None
                    } else {
                        Some(UploadAction::AddFile(path))
                    }
                }
                _ => self.submit().map(UploadAction::Submit),
            },
            KeyCode::Up if self.focus == FOCUS_LIST => {
                if let Some(selected) = self.list_state.selected() {
                    self.list_state.select(Some(selected.saturating_sub(1)));
                }
                None
            }
            KeyCode::Down if self.focus == FOCUS_LIST => {
                if let Some(selected) = self.list_state.selected() {
                    let last = self.attachments.len().saturating_sub(1);
                    self.list_state.select(Some((selected + 1).min(last)));
                }
                None
            }
            KeyCode::Delete | KeyCode::Backspace if self.focus == FOCUS_LIST => {
                if let Some(selected) = self.list_state.selected() {
                    self.remove_attachment(selected);
                    if self.attachments.is_empty() {
                        self.set_focus(FIELD_FILE_PATH);
                    }
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.fields.get_mut(self.focus) {
                    field.delete_char();
                }
                None
            }
            KeyCode::Left => {
                if let Some(field) = self.fields.fields.get_mut(self.focus) {
                    field.move_cursor_left();
                }
                None
            }
            KeyCode::Right => {
                if let Some(field) = self.fields.fields.get_mut(self.focus) {
                    field.move_cursor_right();
                }
                None
            }
            KeyCode::Char(c) if self.focus != FOCUS_LIST => {
                if let Some(field) = self.fields.fields.get_mut(self.focus) {
                    field.insert_char(c);
                }
                None
            }
            _ => None,
        }
    }

    /// Called by the screen after the file path was attached successfully
    pub fn clear_file_path(&mut self) {
        if let Some(field) = self.fields.fields.get_mut(FIELD_FILE_PATH) {
            field.clear();
        }
    }

    /// Render as a centered popup over the page
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 80, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!("Upload Report: {}", self.target_label))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // name
                Constraint::Length(3), // description
                Constraint::Length(3), // file path
                Constraint::Min(3),    // pending attachments
                Constraint::Length(2), // error / status
                Constraint::Length(1), // hint
            ])
            .split(inner);

        for (i, field) in self.fields.fields.iter().enumerate() {
            field.render(f, chunks[i]);
        }

        let items: Vec<ListItem> = self
            .attachments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let style = if self.focus == FOCUS_LIST && Some(i) == self.list_state.selected() {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(Line::styled(
                    format!("{} ({} bytes)", a.file_name, a.size()),
                    style,
                ))
            })
            .collect();

        let list_border = if self.focus == FOCUS_LIST {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };
        let list = List::new(items).block(
            Block::default()
                .title(format!("Attachments ({})", self.attachments.len()))
                .borders(Borders::ALL)
                .border_style(list_border),
        );
        f.render_stateful_widget(list, chunks[3], &mut self.list_state);

        if self.uploading {
            f.render_widget(Paragraph::new("Uploading...").style(Styles::warning()), chunks[4]);
        } else if let Some(ref error) = self.submit_error {
            f.render_widget(Paragraph::new(error.clone()).style(Styles::error()), chunks[4]);
        }

        let hint = Paragraph::new(
            "Tab: next | Enter on path: attach | Del in list: remove | Enter: upload | Esc: cancel",
        )
        .style(Styles::inactive());
        f.render_widget(hint, chunks[5]);
    }
}
