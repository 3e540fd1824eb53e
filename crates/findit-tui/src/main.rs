//! `findit-tui` -- Terminal client for a FindIt lost-and-found server.
//!
//! Built on [ratatui](https://ratatui.rs) with state from `findit-core`:
//! the session store gates the dashboard, post, and admin screens; the
//! home screen searches and filters the global listing.
//!
//! Logs are written to a file (default `/tmp/findit-tui.log`) to avoid
//! corrupting the terminal UI. A background bridge task streams session,
//! notification, and listing changes into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod services;
mod session_bridge;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use findit_api::ApiClient;

use crate::app::App;
use crate::services::Services;

/// Terminal client for browsing and posting lost-and-found listings.
#[derive(Parser, Debug)]
#[command(name = "findit-tui", version, about)]
struct Cli {
    /// FindIt server URL (e.g., https://findit.example.com)
    #[arg(short = 's', long, env = "FINDIT_SERVER")]
    server: Option<String>,

    /// Config file path (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip TLS certificate verification (self-hosted deployments)
    #[arg(long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/findit-tui.log)
    #[arg(long, default_value = "/tmp/findit-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr -- that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "findit_tui={log_level},findit_core={log_level},findit_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("findit-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve configuration (file + env), then apply CLI overrides.
fn build_api_client(cli: &Cli) -> Result<ApiClient> {
    let mut config = match &cli.config {
        Some(path) => findit_config::load_config_from(path)?,
        None => findit_config::load_config()?,
    };

    if let Some(ref server) = cli.server {
        config.server = server.clone();
    }
    if cli.insecure {
        config.insecure = true;
    }

    let client_config = findit_config::to_client_config(&config)?;
    info!(server = %client_config.server, "connecting to FindIt server");

    ApiClient::new(client_config.server, &client_config.transport)
        .map_err(|e| eyre!("failed to build API client: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file -- hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let api = Arc::new(build_api_client(&cli)?);
    let services = Services::new(api);

    let mut app = App::new(services);
    app.run().await?;

    Ok(())
}
