//! Terminal user interface

pub mod app;
pub mod components;
pub mod modals;
pub mod screens;
pub mod ui;

pub use app::App;
