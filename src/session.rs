//! Application context built once at startup and threaded into the TUI.
//!
//! Replaces ambient global auth state: the token and profile are resolved
//! at the composition root and passed down explicitly.

use crate::models::UserProfile;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: String, user: UserProfile) -> Self {
        Self { token, user }
    }

    /// Name to show in the status bar
    pub fn display_name(&self) -> &str {
        self.user.name.as_deref().unwrap_or("signed in")
    }

    pub fn role(&self) -> &str {
        self.user.role.as_deref().unwrap_or("staff")
    }
}
