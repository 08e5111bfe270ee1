//! `samdash-tui`: terminal dashboard for administering a SAM
//! speed-monitoring fleet.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `samdash-core`'s [`EntityStream`](samdash_core::EntityStream). After
//! sign-in, tabs are navigable via number keys: Devices, Locations, Emails,
//! Logs, Data, and for admins Users and Access.
//!
//! Logs are written to a file (default in the samdash data directory) to
//! avoid corrupting the terminal UI. A background data bridge task streams
//! list updates from the controller into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use samdash_core::{Controller, ControllerConfig, TlsVerification};

use crate::app::App;

/// Terminal dashboard for SAM speed-monitoring units.
#[derive(Parser, Debug)]
#[command(name = "samdash-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "SAMDASH_PROFILE")]
    profile: Option<String>,

    /// Backend URL, overriding the profile (e.g. http://10.0.0.5:8080)
    #[arg(short = 'u', long, env = "SAMDASH_URL")]
    url: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path (defaults to samdash-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr; that would
/// corrupt the TUI output. The returned guard flushes logs on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "samdash_tui={log_level},samdash_core={log_level},samdash_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| samdash_config::log_dir().join("samdash-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "samdash-tui.log".into(), std::ffi::OsStr::to_os_string);
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the backend from flags and the shared config file.
///
/// Returns the controller config, the profile's username (prefills the
/// sign-in form) and the configured page size.
fn build_controller_config(cli: &Cli) -> Result<(ControllerConfig, Option<String>, usize)> {
    let cfg = samdash_config::load_config().wrap_err("could not read the samdash config")?;
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    let profile = cfg.profiles.get(&profile_name);

    let mut config = match (profile, cli.url.as_deref()) {
        (Some(profile), _) => samdash_config::profile_to_controller_config(profile, &profile_name)?,
        (None, Some(_)) => {
            let mut config = ControllerConfig::new(parse_url(cli.url.as_deref())?);
            config.session_path = Some(samdash_config::session_path(&profile_name));
            config
        }
        (None, None) => {
            return Err(eyre!(
                "no profile '{profile_name}' in {}; run `samdash config init` or pass --url",
                samdash_config::config_path().display()
            ));
        }
    };

    if cli.url.is_some() {
        config.url = parse_url(cli.url.as_deref())?;
    }
    if cli.insecure || (cfg.defaults.insecure && config.tls == TlsVerification::SystemDefaults) {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }

    let username = profile.and_then(|p| p.username.clone());
    Ok((config, username, cfg.defaults.page_size))
}

fn parse_url(raw: Option<&str>) -> Result<url::Url> {
    let raw = raw.unwrap_or_default();
    raw.parse()
        .wrap_err_with(|| format!("invalid backend URL: {raw}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let (config, username, page_size) = build_controller_config(&cli)?;
    info!(url = %config.url, "starting samdash-tui");

    let controller = Controller::new(config)?;
    let mut app = App::new(controller, username, page_size);
    app.run().await?;

    Ok(())
}
