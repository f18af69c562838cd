//! subhop CLI - binary entry point and poll loop.
//!
//! # Event Loop
//!
//! 1. Fetch the subscriber count
//! 2. On an increase, run one full cycle (connect, search, teleport, disconnect)
//! 3. Sleep for the configured interval, or exit on Ctrl-C

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::ctrl_c;
use tokio::time::sleep;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use subhop::{CycleOutcome, Poller, TickOutcome, run_cycle};
use subhop_config::Settings;
use subhop_trigger::YouTubeSource;

/// Teleports a player to a safe random spot whenever the subscriber count goes up
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.subhop/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Enable debug logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
    /// Run a single search-and-teleport cycle now and exit
    #[arg(long)]
    once: bool,
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut init_warnings = Vec::new();
    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            init_warnings.push(format!(
                "Failed to open log file {}: {e}",
                path.display()
            ));
            None
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(env_filter)
        .init();

    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

async fn run_and_report(settings: &Settings) {
    match run_cycle(settings).await {
        Ok(CycleOutcome::Teleported(position)) => {
            tracing::info!(subject = %settings.subject, %position, "Cycle complete");
        }
        Ok(CycleOutcome::NotFound { attempts }) => {
            tracing::warn!(attempts, "No safe location found; subject not moved");
        }
        Ok(CycleOutcome::SubjectNotFound) => {
            tracing::warn!(subject = %settings.subject, "Subject not found; not moved");
        }
        Err(e) => {
            tracing::error!(error = %e, "RCON cycle failed; retrying next interval");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("loading configuration")?;
    init_tracing(args.verbose, settings.log_file.as_deref());
    tracing::debug!(?settings, "Configuration loaded");

    if args.once {
        run_and_report(&settings).await;
        return Ok(());
    }

    settings.require_trigger()?;
    let source =
        YouTubeSource::new(&settings.trigger).context("creating subscriber source")?;
    let mut poller = Poller::new();
    tracing::info!(
        interval_secs = settings.trigger.interval_secs,
        subject = %settings.subject,
        "Polling subscriber count"
    );

    loop {
        let outcome = poller.tick(&source, || run_and_report(&settings)).await;
        if outcome == TickOutcome::Idle {
            tracing::debug!(count = ?poller.last_count(), "No increase");
        }

        tokio::select! {
            () = sleep(settings.trigger.interval()) => {}
            _ = ctrl_c() => {
                tracing::info!("Interrupted; shutting down");
                break;
            }
        }
    }

    Ok(())
}
