//! Form field component for modal editors

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::ui::Styles;

/// Kind of value a field accepts; drives validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    /// Non-negative amount
    Price,
    /// 10-digit phone number
    Phone,
    Email,
    /// YYYY-MM-DD
    Date,
    /// Fixed option set, cycled with ←/→
    Select(Vec<String>),
}

/// Single controlled input field
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub placeholder: String,
    pub kind: FieldKind,
    pub required: bool,
    pub is_focused: bool,
    pub cursor_position: usize,
    pub validation_error: Option<String>,
    selected_option: usize,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let value = match &kind {
            FieldKind::Select(options) => options.first().cloned().unwrap_or_default(),
            _ => String::new(),
        };
        Self {
            name,
            label,
            cursor_position: value.len(),
            value,
            placeholder: String::new(),
            kind,
            required: false,
            is_focused: false,
            validation_error: None,
            selected_option: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.len();
        if let FieldKind::Select(ref options) = self.kind {
            if let Some(index) = options.iter().position(|o| o == value) {
                self.selected_option = index;
            }
        }
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        if matches!(self.kind, FieldKind::Select(_)) {
            return;
        }
        self.value.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if matches!(self.kind, FieldKind::Select(_)) {
            return;
        }
        if self.cursor_position > 0 {
            let prev = self.value[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev);
            self.cursor_position = prev;
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.value[..self.cursor_position]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.value[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    /// Terminal column of the cursor; `cursor_position` is a byte offset
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.cursor_position].chars().count() as u16
    }

    /// Cycle a select field to the previous option
    pub fn cycle_prev(&mut self) {
        if let FieldKind::Select(ref options) = self.kind {
            if options.is_empty() {
                return;
            }
            self.selected_option = if self.selected_option == 0 {
                options.len() - 1
            } else {
                self.selected_option - 1
            };
            self.value = options[self.selected_option].clone();
            self.validation_error = None;
        }
    }

    /// Cycle a select field to the next option
    pub fn cycle_next(&mut self) {
        if let FieldKind::Select(ref options) = self.kind {
            if options.is_empty() {
                return;
            }
            self.selected_option = (self.selected_option + 1) % options.len();
            self.value = options[self.selected_option].clone();
            self.validation_error = None;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
    }

    /// Validate the field, recording and returning any error
    pub fn validate(&mut self) -> bool {
        self.validation_error = None;
        let trimmed = self.value.trim();

        if trimmed.is_empty() {
            if self.required {
                self.validation_error = Some(format!("{} is required", self.label));
                return false;
            }
            return true;
        }

        match self.kind {
            FieldKind::Price => match trimmed.parse::<f64>() {
                Ok(price) if price >= 0.0 => {}
                Ok(_) => {
                    self.validation_error = Some(format!("{} must not be negative", self.label));
                    return false;
                }
                Err(_) => {
                    self.validation_error = Some(format!("{} must be a number", self.label));
                    return false;
                }
            },
            FieldKind::Phone => {
                if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
                    self.validation_error =
                        Some(format!("{} must be a 10-digit number", self.label));
                    return false;
                }
            }
            FieldKind::Email => {
                let valid = trimmed
                    .split_once('@')
                    .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                    .unwrap_or(false);
                if !valid {
                    self.validation_error = Some(format!("{} is not a valid email", self.label));
                    return false;
                }
            }
            FieldKind::Date => {
                if chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
                    self.validation_error =
                        Some(format!("{} must use YYYY-MM-DD", self.label));
                    return false;
                }
            }
            FieldKind::Text | FieldKind::Select(_) => {}
        }

        true
    }

    /// Render the field with focus and error borders
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let display_text = if self.value.is_empty() && !self.placeholder.is_empty() {
            &self.placeholder
        } else {
            &self.value
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let title = if let Some(ref error) = self.validation_error {
            format!("{} - {}", self.label, error)
        } else if self.required {
            format!("{} *", self.label)
        } else {
            self.label.to_string()
        };

        let text_style = if self.value.is_empty() && !self.placeholder.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused && !matches!(self.kind, FieldKind::Select(_)) {
            let cursor_x = area.x + 1 + self.cursor_column();
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width - 1 {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Ordered field collection with one focused field
pub struct FieldSet {
    pub fields: Vec<FormField>,
    pub current: usize,
}

impl FieldSet {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut set = Self { fields, current: 0 };
        set.update_focus();
        set
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current);
        }
    }

    pub fn next_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.fields.len();
        self.update_focus();
    }

    pub fn previous_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.current = if self.current == 0 {
            self.fields.len() - 1
        } else {
            self.current - 1
        };
        self.update_focus();
    }

    pub fn current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current)
    }

    /// Value of a field by name, trimmed
    pub fn value_of(&self, name: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.trim().to_string())
            .unwrap_or_default()
    }

    /// Validate every field; true only when all pass
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for field in &mut self.fields {
            if !field.validate() {
                all_valid = false;
            }
        }
        all_valid
    }

    /// First validation message, for the modal's error line
    pub fn first_error(&self) -> Option<String> {
        self.fields
            .iter()
            .find_map(|f| f.validation_error.clone())
    }

    pub fn clear_all(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current = 0;
        self.update_focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_rejects_blank() {
        let mut field = FormField::new("name", "Test Name", FieldKind::Text).required();
        assert!(!field.validate());
        assert!(field.validation_error.as_deref().unwrap().contains("required"));

        field = field.with_value("X-Ray");
        assert!(field.validate());
    }

    #[test]
    fn test_price_validation() {
        let mut price = FormField::new("price", "Price", FieldKind::Price).required();
        assert!(!price.validate()); // blank

        let mut price = FormField::new("price", "Price", FieldKind::Price).with_value("300");
        assert!(price.validate());

        let mut price = FormField::new("price", "Price", FieldKind::Price).with_value("-5");
        assert!(!price.validate());

        let mut price = FormField::new("price", "Price", FieldKind::Price).with_value("cheap");
        assert!(!price.validate());
    }

    #[test]
    fn test_phone_validation() {
        let mut phone = FormField::new("phone", "Phone", FieldKind::Phone).with_value("9876543210");
        assert!(phone.validate());

        let mut phone = FormField::new("phone", "Phone", FieldKind::Phone).with_value("12345");
        assert!(!phone.validate());

        let mut phone = FormField::new("phone", "Phone", FieldKind::Phone).with_value("98765X3210");
        assert!(!phone.validate());
    }

    #[test]
    fn test_email_validation() {
        let mut email = FormField::new("email", "Email", FieldKind::Email).with_value("a@b.com");
        assert!(email.validate());

        let mut email = FormField::new("email", "Email", FieldKind::Email).with_value("a-b.com");
        assert!(!email.validate());

        let mut email = FormField::new("email", "Email", FieldKind::Email).with_value("a@bcom");
        assert!(!email.validate());
    }

    #[test]
    fn test_optional_blank_field_passes() {
        let mut field = FormField::new("desc", "Description", FieldKind::Text);
        assert!(field.validate());
    }

    #[test]
    fn test_select_cycles_options() {
        let options = vec!["09:00".to_string(), "10:30".to_string(), "14:00".to_string()];
        let mut field = FormField::new("time", "Time", FieldKind::Select(options));
        assert_eq!(field.value, "09:00");
        field.cycle_next();
        assert_eq!(field.value, "10:30");
        field.cycle_prev();
        field.cycle_prev();
        assert_eq!(field.value, "14:00");
        // typing is ignored on selects
        field.insert_char('x');
        assert_eq!(field.value, "14:00");
    }

    #[test]
    fn test_cursor_column_counts_chars_not_bytes() {
        let mut field = FormField::new("name", "Patient Name", FieldKind::Text);
        field.insert_char('J');
        field.insert_char('ö');
        field.insert_char('r');
        assert_eq!(field.cursor_position, 4); // bytes
        assert_eq!(field.cursor_column(), 3); // columns
        field.move_cursor_left();
        assert_eq!(field.cursor_column(), 2);
    }

    #[test]
    fn test_fieldset_focus_and_errors() {
        let mut set = FieldSet::new(vec![
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("price", "Price", FieldKind::Price).required(),
        ]);
        assert!(set.fields[0].is_focused);
        set.next_field();
        assert!(set.fields[1].is_focused);
        assert!(!set.fields[0].is_focused);

        assert!(!set.validate_all());
        assert!(set.first_error().unwrap().contains("Name"));

        set.fields[0] = set.fields[0].clone().with_value("X-Ray");
        set.fields[1] = set.fields[1].clone().with_value("300");
        assert!(set.validate_all());
        assert_eq!(set.value_of("name"), "X-Ray");
    }
}
