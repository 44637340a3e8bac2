//! Log setup: colored console output plus one plain-text file per run.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// How to set up logging for this run.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Debug level instead of info (ignored when `RUST_LOG` is set)
    pub verbose: bool,
    /// Plain console output
    pub no_color: bool,
    /// Write a log file into this directory
    pub file_dir: Option<PathBuf>,
}

/// Name of the log file for a run started at `now`.
#[must_use]
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("nextdns-updater_{}.log", now.format("%Y%m%d-%H%M%S"))
}

/// Install the global subscriber. Returns the log file path, if any.
pub fn init(options: &LogOptions) -> Result<Option<PathBuf>> {
    let default_level = if options.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = fmt::layer()
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_ansi(!options.no_color)
        .with_writer(std::io::stderr);

    let (file_layer, file_path) = match &options.file_dir {
        Some(dir) => {
            let (file, path) = create_log_file(dir)?;
            let layer = fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(file_path)
}

fn create_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let path = dir.join(log_file_name(Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    Ok((file, path))
}
