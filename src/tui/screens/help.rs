//! Help screen with per-page keyboard reference

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::screens::ScreenEvent;
use crate::tui::ui::Styles;

/// Help sections
#[derive(Debug, Clone, PartialEq)]
pub enum HelpSection {
    Overview,
    Navigation,
    Appointments,
    Labs,
    Tests,
    Shortcuts,
}

impl HelpSection {
    pub fn as_str(&self) -> &str {
        match self {
            HelpSection::Overview => "Overview",
            HelpSection::Navigation => "Navigation",
            HelpSection::Appointments => "Appointments",
            HelpSection::Labs => "Lab Test Catalog",
            HelpSection::Tests => "Patient Tests & Reports",
            HelpSection::Shortcuts => "Keyboard Shortcuts",
        }
    }

    fn lines(&self) -> Vec<&'static str> {
        match self {
            HelpSection::Overview => vec![
                "Clinic Desk is a terminal front desk for the clinic API.",
                "",
                "It covers appointment booking and cancellation, vitals entry,",
                "the doctor directory, registered patients, the priced lab test",
                "catalog, and report uploads for ordered patient tests.",
                "",
                "Each page loads its records from the server when opened and",
                "refetches after every successful change.",
            ],
            HelpSection::Navigation => vec![
                "Up/Down      move the selection",
                "Enter        open or confirm",
                "Esc          go back one screen, or close a popup",
                "q            quit from anywhere outside a form",
                "?            toggle this help",
                "r            retry a failed load",
            ],
            HelpSection::Appointments => vec![
                "a            book a new appointment",
                "Enter / v    open the selected booking",
                "d            cancel the selected booking",
                "",
                "Inside the booking detail:",
                "c            cancel the appointment",
                "t            record vitals for the visit",
            ],
            HelpSection::Labs => vec![
                "a            add a lab test to the catalog",
                "e            edit the selected lab test",
                "",
                "A lab test needs a name and a numeric price. The",
                "description is optional.",
            ],
            HelpSection::Tests => vec![
                "r            upload a result report for the selected test",
                "",
                "In the upload popup, type a file path and press Enter to",
                "attach it. Tab moves between fields and the attachment",
                "list; Delete removes the highlighted attachment. At least",
                "one attachment and a report name are required.",
            ],
            HelpSection::Shortcuts => vec![
                "Main menu:   A appointments, D doctors, P patients,",
                "             L lab tests, T patient tests, H help",
                "",
                "Forms:       Tab/Down next field, Shift-Tab/Up previous,",
                "             Left/Right move the cursor or cycle a choice,",
                "             Enter submit, Esc discard",
            ],
        }
    }
}

/// Help screen state
pub struct HelpScreen {
    pub sections: Vec<HelpSection>,
    pub section_state: ListState,
}

impl HelpScreen {
    pub fn new() -> Self {
        let sections = vec![
            HelpSection::Overview,
            HelpSection::Navigation,
            HelpSection::Appointments,
            HelpSection::Labs,
            HelpSection::Tests,
            HelpSection::Shortcuts,
        ];

        let mut section_state = ListState::default();
        section_state.select(Some(0));

        Self {
            sections,
            section_state,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenEvent> {
        match key.code {
            KeyCode::Up => {
                let selected = self.section_state.selected().unwrap_or(0);
                let new_selected = if selected == 0 {
                    self.sections.len() - 1
                } else {
                    selected - 1
                };
                self.section_state.select(Some(new_selected));
                None
            }
            KeyCode::Down => {
                let selected = self.section_state.selected().unwrap_or(0);
                self.section_state
                    .select(Some((selected + 1) % self.sections.len()));
                None
            }
            KeyCode::Esc => Some(ScreenEvent::Back),
            _ => None,
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);

        let items: Vec<ListItem> = self
            .sections
            .iter()
            .map(|section| ListItem::new(section.as_str()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(list, chunks[0], &mut self.section_state);

        let section = self
            .section_state
            .selected()
            .and_then(|i| self.sections.get(i))
            .unwrap_or(&HelpSection::Overview);
        let body: Vec<Line> = section
            .lines()
            .into_iter()
            .map(|line| Line::from(Span::raw(line)))
            .collect();
        let paragraph = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(section.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, chunks[1]);
    }
}
