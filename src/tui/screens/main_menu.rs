//! Main menu screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::session::Session;
use crate::tui::app::Screen;
use crate::tui::ui::Styles;

/// Main menu options
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: String,
    pub description: String,
    pub shortcut: char,
    pub screen: Screen,
}

impl MenuOption {
    pub fn new(title: &str, description: &str, shortcut: char, screen: Screen) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            shortcut,
            screen,
        }
    }
}

/// Main menu screen state
pub struct MainMenuScreen {
    pub menu_state: ListState,
    pub menu_options: Vec<MenuOption>,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        let menu_options = vec![
            MenuOption::new(
                "Appointments",
                "Browse bookings, book new appointments, record vitals",
                'A',
                Screen::Appointments,
            ),
            MenuOption::new(
                "Doctors",
                "Browse the doctor directory",
                'D',
                Screen::Doctors,
            ),
            MenuOption::new(
                "Patients",
                "Browse registered patients",
                'P',
                Screen::Patients,
            ),
            MenuOption::new(
                "Lab Tests",
                "Manage the priced lab test catalog",
                'L',
                Screen::Labs,
            ),
            MenuOption::new(
                "Patient Tests",
                "Track ordered tests and upload result reports",
                'T',
                Screen::Tests,
            ),
            MenuOption::new("Help", "View help and keyboard shortcuts", 'H', Screen::Help),
        ];

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            menu_state,
            menu_options,
        }
    }

    /// Handle key events; returns the screen to navigate to, if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Screen> {
        match key.code {
            KeyCode::Up => {
                let selected = self.menu_state.selected().unwrap_or(0);
                let new_selected = if selected == 0 {
                    self.menu_options.len() - 1
                } else {
                    selected - 1
                };
                self.menu_state.select(Some(new_selected));
                None
            }
            KeyCode::Down => {
                let selected = self.menu_state.selected().unwrap_or(0);
                let new_selected = (selected + 1) % self.menu_options.len();
                self.menu_state.select(Some(new_selected));
                None
            }
            KeyCode::Enter => self
                .menu_state
                .selected()
                .and_then(|i| self.menu_options.get(i))
                .map(|option| option.screen.clone()),
            KeyCode::Char(c) => {
                let upper_c = c.to_ascii_uppercase();
                self.menu_options
                    .iter()
                    .find(|option| option.shortcut == upper_c)
                    .map(|option| option.screen.clone())
            }
            _ => None,
        }
    }

    /// Draw the main menu screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(5),
            ])
            .split(area);

        self.draw_title(f, chunks[0], session);
        self.draw_menu(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);
    }

    fn draw_title(&self, f: &mut Frame, area: Rect, session: &Session) {
        let title = Paragraph::new(format!(
            "Clinic Desk - {} ({})",
            session.display_name(),
            session.role()
        ))
        .style(Styles::title().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .menu_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == self.menu_state.selected() {
                    Styles::selected()
                } else {
                    Style::default()
                };

                let content = vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(&option.title, style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if Some(i) == self.menu_state.selected() {
                            style
                        } else {
                            Styles::inactive()
                        },
                    )),
                ];

                ListItem::new(content)
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Main Menu")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.menu_state);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("Up/Down to move, "),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to select"),
            ]),
            Line::from(vec![
                Span::styled("Shortcuts: ", Styles::info()),
                Span::styled("A/D/P/L/T/H", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" for direct access"),
            ]),
            Line::from(vec![
                Span::styled("Global: ", Styles::info()),
                Span::styled("?", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" for help, "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to quit from anywhere"),
            ]),
        ];

        let instructions_paragraph = Paragraph::new(instructions).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions_paragraph, area);
    }
}
