//! Screen modules: one page controller per entity

pub mod appointment_view;
pub mod appointments;
pub mod doctors;
pub mod help;
pub mod labs;
pub mod main_menu;
pub mod patients;
pub mod test_view;
pub mod tests;

pub use appointment_view::AppointmentViewScreen;
pub use appointments::AppointmentsScreen;
pub use doctors::DoctorsScreen;
pub use help::HelpScreen;
pub use labs::LabsScreen;
pub use main_menu::MainMenuScreen;
pub use patients::PatientsScreen;
pub use test_view::TestViewScreen;
pub use tests::TestsScreen;

/// Screen-to-app requests produced by key handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// Navigate back to the previous screen
    Back,
    /// Open the detail view for one appointment
    OpenAppointment(String),
    /// Open the detail view for one patient test
    OpenTest(String),
    /// Show a status message in the app status bar
    Status(String),
    /// Show an error message in the app status bar
    Error(String),
}
