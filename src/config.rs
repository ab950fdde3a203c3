//! Centralized configuration management for clinidesk

use anyhow::{Context, Result};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the clinic REST backend
    pub api_base_url: String,
    /// Login email (flag or environment)
    pub email: Option<String>,
    /// Login password (flag or environment)
    pub password: Option<String>,
    /// Pre-issued bearer token, skips the login call when set
    pub token: Option<String>,
    /// Request retry configuration
    pub retries: RetryConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Log file path for TUI mode
    pub log_file: String,
}

/// Retry configuration for read requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first failure (queries only)
    pub query_retries: u32,
    /// Base delay between attempts (milliseconds), doubled per attempt
    pub backoff_base_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            query_retries: 2,
            backoff_base_ms: 200,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "clinidesk/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            email: None,
            password: None,
            token: None,
            retries: RetryConfig::default(),
            http: HttpConfig::default(),
            log_file: "clinidesk.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("CLINIDESK_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let retries = RetryConfig {
            query_retries: parse_env_var("CLINIDESK_QUERY_RETRIES")?.unwrap_or(2),
            backoff_base_ms: parse_env_var("CLINIDESK_BACKOFF_BASE_MS")?.unwrap_or(200),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("CLINIDESK_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("CLINIDESK_USER_AGENT")
                .unwrap_or_else(|_| "clinidesk/0.1.0".to_string()),
        };

        Ok(Config {
            api_base_url,
            email: std::env::var("CLINIDESK_EMAIL").ok(),
            password: std::env::var("CLINIDESK_PASSWORD").ok(),
            token: std::env::var("CLINIDESK_TOKEN").ok(),
            retries,
            http,
            log_file: std::env::var("CLINIDESK_LOG_FILE")
                .unwrap_or_else(|_| "clinidesk.log".to_string()),
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get backoff base as Duration
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.retries.backoff_base_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(anyhow::anyhow!("API base URL must not be empty"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                self.api_base_url
            ));
        }
        if self.token.is_none() && (self.email.is_none() || self.password.is_none()) {
            return Err(anyhow::anyhow!(
                "Either CLINIDESK_TOKEN or CLINIDESK_EMAIL and CLINIDESK_PASSWORD must be set"
            ));
        }
        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
