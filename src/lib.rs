//! Terminal client for clinic reception and lab record management

pub mod api;
pub mod config;
pub mod models;
pub mod request;
pub mod session;
pub mod tui;
