//! `tourdesk-tui`: terminal dashboard for the tourism catalog admin API.
//!
//! Built on [ratatui](https://ratatui.rs). One screen per resource, reachable
//! with number keys (1-9): Hotels, Posadas, Restaurants, Services, Sponsors,
//! Ads, Spots, Orders and Users. Each screen is backed by a list worker that
//! owns its `ListController`, so paging and search never block rendering.
//!
//! Logs are written to a file (default `/tmp/tourdesk-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod worker;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tourdesk_config::Profile;
use tourdesk_core::{ApiClient, QueryCache, QueryClient};

use crate::app::App;

/// Terminal dashboard for managing the tourism catalog.
#[derive(Parser, Debug)]
#[command(name = "tourdesk-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "TOURDESK_PROFILE")]
    profile: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(short = 'u', long, env = "TOURDESK_API_URL")]
    api_url: Option<String>,

    /// Bearer token (overrides the profile)
    #[arg(short = 't', long, env = "TOURDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/tourdesk-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing; stdout belongs to the terminal UI. Hold the guard
/// until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tourdesk_tui={log_level},tourdesk_core={log_level},tourdesk_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("tourdesk-tui.log"));

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

/// Resolve profile, URL and token the same way the CLI does.
fn build_client(cli: &Cli) -> Result<(QueryClient, std::time::Duration)> {
    let cfg = tourdesk_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if cli.profile.is_some() => {
            return Err(eyre!(
                "profile '{profile_name}' not found (available: {})",
                cfg.profile_names().join(", ")
            ));
        }
        None => Profile::default(),
    };

    let api_url = cli.api_url.as_deref().unwrap_or(&profile.api_url);
    let token = cli.token.clone().map(SecretString::from).or_else(|| {
        tourdesk_config::resolve_token(&profile, &profile_name).map(|(token, source)| {
            debug!(?source, "token resolved");
            token
        })
    });

    let api = ApiClient::new(api_url, &profile.transport(&cfg.defaults))?.with_token(token);
    info!(profile = %profile_name, api = %api.base_url(), "session ready");

    Ok((QueryClient::new(api, QueryCache::new()), profile.debounce()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a panic restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);
    info!("starting tourdesk-tui");

    let (client, debounce) = build_client(&cli)?;
    let mut app = App::new(client, debounce);
    app.run().await?;

    Ok(())
}
