//! Clinic desk TUI entry point

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use clinidesk::api::ApiClient;
use clinidesk::config::Config;
use clinidesk::request::QueryOptions;
use clinidesk::session::Session;
use clinidesk::tui::App;

#[derive(Parser)]
#[command(name = "clinidesk")]
#[command(about = "Terminal client for clinic reception and lab records")]
#[command(version)]
struct Cli {
    /// Base URL of the clinic API, overrides CLINIDESK_API_URL
    #[arg(long)]
    api_url: Option<String>,
    /// Login email, overrides CLINIDESK_EMAIL
    #[arg(long)]
    email: Option<String>,
    /// Login password, overrides CLINIDESK_PASSWORD
    #[arg(long)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "clinidesk=info");
    }

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(email) = cli.email {
        config.email = Some(email);
    }
    if let Some(password) = cli.password {
        config.password = Some(password);
    }
    config.validate()?;

    // Log to a file so output does not interfere with the TUI
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    info!("Starting clinidesk against {}", config.api_base_url);

    let session = sign_in(&config).await?;
    let client = ApiClient::new(&config)?.with_token(session.token.clone());
    let options = QueryOptions {
        retries: config.retries.query_retries,
        backoff_base: config.backoff_base(),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, session, options);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("clinidesk exited");
            Ok(())
        }
        Err(e) => {
            error!("clinidesk exited with an error: {}", e);
            Err(e)
        }
    }
}

/// Resolve a session from a pre-issued token or a login call
async fn sign_in(config: &Config) -> Result<Session> {
    let client = ApiClient::new(config)?;

    if let Some(ref token) = config.token {
        let user = client
            .clone()
            .with_token(token.clone())
            .profile()
            .await
            .context("token rejected by the profile endpoint")?;
        return Ok(Session::new(token.clone(), user));
    }

    let (email, password) = match (&config.email, &config.password) {
        (Some(email), Some(password)) => (email.as_str(), password.as_str()),
        _ => anyhow::bail!("set CLINIDESK_TOKEN or CLINIDESK_EMAIL and CLINIDESK_PASSWORD"),
    };

    let login = client.login(email, password).await.context("login failed")?;
    let user = match login.user {
        Some(user) => user,
        None => {
            client
                .clone()
                .with_token(login.token.clone())
                .profile()
                .await
                .context("profile fetch after login failed")?
        }
    };
    Ok(Session::new(login.token, user))
}
