//! Loading / error / info panel shown in place of page content

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::Styles;

#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Error,
    Loading,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: StatusKind::Error }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: StatusKind::Loading }
    }

    fn prefix(&self) -> &'static str {
        match self.kind {
            StatusKind::Error => "✗",
            StatusKind::Loading => "⟳",
        }
    }

    fn style(&self) -> ratatui::style::Style {
        match self.kind {
            StatusKind::Error => Styles::error(),
            StatusKind::Loading => Styles::warning(),
        }
    }
}

/// Full-area panel for a page's loading or error state
pub struct StatusDisplay;

impl StatusDisplay {
    /// Render a loading panel
    pub fn render_loading(f: &mut Frame, area: Rect, what: &str) {
        let message = StatusMessage::loading(format!("Loading {}...", what));
        Self::render(f, area, &message, None);
    }

    /// Render an error panel; the message is shown verbatim
    pub fn render_error(f: &mut Frame, area: Rect, message: &str, retryable: bool) {
        let status = StatusMessage::error(message);
        let hint = if retryable { Some("Press 'r' to retry, Esc to go back") } else { Some("Press Esc to go back") };
        Self::render(f, area, &status, hint);
    }

    fn render(f: &mut Frame, area: Rect, status: &StatusMessage, hint: Option<&str>) {
        let mut text = format!("{} {}", status.prefix(), status.message);
        if let Some(hint) = hint {
            text.push_str("\n\n");
            text.push_str(hint);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(text)
            .style(status.style())
            .wrap(Wrap { trim: true })
            .block(block);

        f.render_widget(paragraph, area);
    }
}
