//! API error taxonomy
//!
//! The `Display` output of every variant is suitable for direct display in
//! the UI; screens show it verbatim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not signed in: no token or credentials available")]
    MissingCredentials,
}

impl ApiError {
    /// Whether a retry could plausibly succeed (network and 5xx failures)
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::MissingCredentials => false,
        }
    }
}

/// Display-ready failure info handed to screens.
///
/// Carries only what the UI contract requires: a message shown verbatim,
/// plus the retryability hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub retryable: bool,
}

impl From<&ApiError> for ErrorInfo {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<ApiError> for ErrorInfo {
    fn from(err: ApiError) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
