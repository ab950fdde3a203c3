//! Main TUI application state and logic

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::api::ApiClient;
use crate::request::QueryOptions;
use crate::session::Session;
use crate::tui::screens::{
    AppointmentViewScreen, AppointmentsScreen, DoctorsScreen, HelpScreen, LabsScreen,
    MainMenuScreen, PatientsScreen, ScreenEvent, TestViewScreen, TestsScreen,
};
use crate::tui::ui::{centered_rect, Styles};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Application screens
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    MainMenu,
    Appointments,
    AppointmentView,
    Doctors,
    Patients,
    Labs,
    Tests,
    TestView,
    Help,
}

/// Main TUI application state
pub struct App {
    pub current_screen: Screen,
    nav_stack: Vec<Screen>,
    client: ApiClient,
    session: Session,
    options: QueryOptions,

    pub main_menu: MainMenuScreen,
    pub appointments: AppointmentsScreen,
    pub appointment_view: Option<AppointmentViewScreen>,
    pub doctors: DoctorsScreen,
    pub patients: PatientsScreen,
    pub labs: LabsScreen,
    pub tests: TestsScreen,
    pub test_view: Option<TestViewScreen>,
    pub help: HelpScreen,

    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub fn new(client: ApiClient, session: Session, options: QueryOptions) -> Self {
        Self {
            current_screen: Screen::MainMenu,
            nav_stack: Vec::new(),
            appointments: AppointmentsScreen::new(client.clone(), options),
            appointment_view: None,
            doctors: DoctorsScreen::new(client.clone(), options),
            patients: PatientsScreen::new(client.clone(), options),
            labs: LabsScreen::new(client.clone(), options),
            tests: TestsScreen::new(client.clone(), options),
            test_view: None,
            main_menu: MainMenuScreen::new(),
            help: HelpScreen::new(),
            client,
            session,
            options,
            should_quit: false,
            show_help_popup: false,
            status_message: None,
            error_message: None,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.tick();
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(TICK_INTERVAL)? {
                if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain settled requests for the active screen; one call per frame
    fn tick(&mut self) {
        let event = match self.current_screen {
            Screen::Appointments => self.appointments.poll(),
            Screen::AppointmentView => {
                self.appointment_view.as_mut().and_then(|view| view.poll())
            }
            Screen::Doctors => self.doctors.poll(),
            Screen::Patients => self.patients.poll(),
            Screen::Labs => self.labs.poll(),
            Screen::Tests => self.tests.poll(),
            Screen::TestView => self.test_view.as_mut().and_then(|view| view.poll()),
            Screen::MainMenu | Screen::Help => None,
        };
        if let Some(event) = event {
            self.apply_event(event);
        }
    }

    fn is_editing(&self) -> bool {
        match self.current_screen {
            Screen::Appointments => self.appointments.is_editing(),
            Screen::AppointmentView => self
                .appointment_view
                .as_ref()
                .is_some_and(|view| view.is_editing()),
            Screen::Labs => self.labs.is_editing(),
            Screen::Tests => self.tests.is_editing(),
            Screen::TestView => self
                .test_view
                .as_ref()
                .is_some_and(|view| view.is_editing()),
            _ => false,
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        self.status_message = None;
        self.error_message = None;

        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        if !self.is_editing() {
            match key.code {
                KeyCode::F(1) | KeyCode::Char('?') => {
                    self.show_help_popup = true;
                    return;
                }
                KeyCode::Char('q') if self.current_screen != Screen::MainMenu => {
                    self.should_quit = true;
                    return;
                }
                _ => {}
            }
        }

        match self.current_screen {
            Screen::MainMenu => {
                if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                    self.should_quit = true;
                } else if let Some(screen) = self.main_menu.handle_key(key) {
                    self.navigate_to_screen(screen);
                }
            }
            Screen::Appointments => {
                if let Some(event) = self.appointments.handle_key(key) {
                    self.apply_event(event);
                }
            }
            Screen::AppointmentView => {
                let event = self
                    .appointment_view
                    .as_mut()
                    .and_then(|view| view.handle_key(key));
                if let Some(event) = event {
                    self.apply_event(event);
                }
            }
            Screen::Doctors => {
                if let Some(event) = self.doctors.handle_key(key) {
                    self.apply_event(event);
                }
            }
            Screen::Patients => {
                if let Some(event) = self.patients.handle_key(key) {
                    self.apply_event(event);
                }
            }
            Screen::Labs => {
                if let Some(event) = self.labs.handle_key(key) {
                    self.apply_event(event);
                }
            }
            Screen::Tests => {
                if let Some(event) = self.tests.handle_key(key) {
                    self.apply_event(event);
                }
            }
            Screen::TestView => {
                let event = self
                    .test_view
                    .as_mut()
                    .and_then(|view| view.handle_key(key));
                if let Some(event) = event {
                    self.apply_event(event);
                }
            }
            Screen::Help => {
                if let Some(event) = self.help.handle_key(key) {
                    self.apply_event(event);
                }
            }
        }
    }

    fn apply_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Back => self.navigate_back(),
            ScreenEvent::OpenAppointment(id) => {
                let mut view =
                    AppointmentViewScreen::new(self.client.clone(), self.options, id);
                view.refresh();
                self.appointment_view = Some(view);
                self.nav_stack.push(self.current_screen.clone());
                self.current_screen = Screen::AppointmentView;
            }
            ScreenEvent::OpenTest(id) => {
                let mut view = TestViewScreen::new(self.client.clone(), self.options, id);
                view.refresh();
                self.test_view = Some(view);
                self.nav_stack.push(self.current_screen.clone());
                self.current_screen = Screen::TestView;
            }
            ScreenEvent::Status(message) => self.status_message = Some(message),
            ScreenEvent::Error(message) => self.error_message = Some(message),
        }
    }

    /// Switch to a screen and load its records
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Appointments => self.appointments.refresh(),
            Screen::Doctors => self.doctors.refresh(),
            Screen::Patients => self.patients.refresh(),
            Screen::Labs => self.labs.refresh(),
            Screen::Tests => self.tests.refresh(),
            Screen::MainMenu | Screen::AppointmentView | Screen::TestView | Screen::Help => {}
        }
        self.nav_stack.push(self.current_screen.clone());
        self.current_screen = screen;
    }

    fn navigate_back(&mut self) {
        if self.current_screen == Screen::AppointmentView {
            self.appointment_view = None;
        }
        if self.current_screen == Screen::TestView {
            self.test_view = None;
        }
        self.current_screen = self.nav_stack.pop().unwrap_or(Screen::MainMenu);
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.current_screen {
            Screen::MainMenu => self.main_menu.draw(f, chunks[0], &self.session),
            Screen::Appointments => self.appointments.draw(f, chunks[0]),
            Screen::AppointmentView => {
                if let Some(ref mut view) = self.appointment_view {
                    view.draw(f, chunks[0]);
                }
            }
            Screen::Doctors => self.doctors.draw(f, chunks[0]),
            Screen::Patients => self.patients.draw(f, chunks[0]),
            Screen::Labs => self.labs.draw(f, chunks[0]),
            Screen::Tests => self.tests.draw(f, chunks[0]),
            Screen::TestView => {
                if let Some(ref mut view) = self.test_view {
                    view.draw(f, chunks[0]);
                }
            }
            Screen::Help => self.help.draw(f, chunks[0]),
        }

        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if let Some(ref msg) = self.status_message {
            format!("Status: {}", msg)
        } else if let Some(ref err) = self.error_message {
            format!("Error: {}", err)
        } else {
            format!(
                "Clinic Desk - {} | {} | ESC: Back | Q: Quit | ?: Help",
                self.session.display_name(),
                match self.current_screen {
                    Screen::MainMenu => "Main Menu",
                    Screen::Appointments => "Appointments",
                    Screen::AppointmentView => "Appointment Detail",
                    Screen::Doctors => "Doctors",
                    Screen::Patients => "Patients",
                    Screen::Labs => "Lab Tests",
                    Screen::Tests => "Patient Tests",
                    Screen::TestView => "Patient Test Detail",
                    Screen::Help => "Help",
                }
            )
        };

        let style = if self.error_message.is_some() {
            Styles::error()
        } else if self.status_message.is_some() {
            Styles::success()
        } else {
            Styles::inactive()
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            ESC - Go back\n\
            Q - Quit application\n\
            ? - Toggle this help\n\n";

        let screen_help = match self.current_screen {
            Screen::MainMenu => {
                "Main Menu:\n\
                Up/Down - Navigate menu\n\
                Enter - Select option\n\
                A/D/P/L/T/H - Direct access"
            }
            Screen::Appointments => {
                "Appointments:\n\
                Up/Down - Navigate bookings\n\
                a - Book new appointment\n\
                Enter/v - View booking\n\
                d - Cancel booking\n\
                r - Retry after a failed load"
            }
            Screen::AppointmentView => {
                "Appointment Detail:\n\
                Up/Down - Scroll\n\
                c - Cancel appointment\n\
                t - Record vitals"
            }
            Screen::Doctors => {
                "Doctors:\n\
                Up/Down - Navigate directory\n\
                r - Retry after a failed load"
            }
            Screen::Patients => {
                "Patients:\n\
                Up/Down - Navigate patients\n\
                r - Retry after a failed load"
            }
            Screen::Labs => {
                "Lab Tests:\n\
                Up/Down - Navigate catalog\n\
                a - Add lab test\n\
                e - Edit lab test\n\
                r - Retry after a failed load"
            }
            Screen::Tests => {
                "Patient Tests:\n\
                Up/Down - Navigate tests\n\
                Enter/v - View test\n\
                r - Upload result report"
            }
            Screen::TestView => {
                "Patient Test Detail:\n\
                Up/Down - Scroll\n\
                u - Upload result report"
            }
            Screen::Help => {
                "Help:\n\
                Up/Down - Switch section\n\
                ESC - Back to main menu"
            }
        };

        format!("{global_help}{screen_help}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::UserProfile;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn test_app() -> App {
        let config = Config {
            api_base_url: "http://localhost:9999".to_string(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        let session = Session::new(
            "token".to_string(),
            UserProfile {
                id: Some("u1".to_string()),
                name: Some("Front Desk".to_string()),
                email: None,
                role: Some("receptionist".to_string()),
            },
        );
        App::new(client, session, QueryOptions::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_menu_selection_navigates_and_back_returns() {
        let mut app = test_app();
        app.handle_key_event(key(KeyCode::Char('d')));
        assert_eq!(app.current_screen, Screen::Doctors);
        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::MainMenu);
    }

    #[tokio::test]
    async fn test_quit_from_entity_screen() {
        let mut app = test_app();
        app.handle_key_event(key(KeyCode::Char('p')));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_popup_toggles() {
        let mut app = test_app();
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.show_help_popup);
        assert_eq!(app.current_screen, Screen::MainMenu);
    }

    #[tokio::test]
    async fn test_open_appointment_pushes_detail_screen() {
        let mut app = test_app();
        app.navigate_to_screen(Screen::Appointments);
        app.apply_event(ScreenEvent::OpenAppointment("b1".to_string()));
        assert_eq!(app.current_screen, Screen::AppointmentView);
        assert!(app.appointment_view.is_some());
        app.apply_event(ScreenEvent::Back);
        assert_eq!(app.current_screen, Screen::Appointments);
        assert!(app.appointment_view.is_none());
    }

    #[tokio::test]
    async fn test_open_test_pushes_detail_screen() {
        let mut app = test_app();
        app.navigate_to_screen(Screen::Tests);
        app.apply_event(ScreenEvent::OpenTest("t1".to_string()));
        assert_eq!(app.current_screen, Screen::TestView);
        assert!(app.test_view.is_some());
        app.apply_event(ScreenEvent::Back);
        assert_eq!(app.current_screen, Screen::Tests);
        assert!(app.test_view.is_none());
    }

    #[test]
    fn test_status_event_lands_in_status_bar() {
        let mut app = test_app();
        app.apply_event(ScreenEvent::Status("Appointment booked".to_string()));
        assert_eq!(app.status_message.as_deref(), Some("Appointment booked"));
    }
}
