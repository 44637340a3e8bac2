//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::logging::{self, LogOptions};

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let output_format = cli.output.or(config.output_format).unwrap_or_default();

    // Only runs that talk to the API get a log file
    let writes_log = !cli.no_log_file && !matches!(cli.command, Commands::Config(_));
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.log_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let log_file = logging::init(&LogOptions {
        verbose: cli.verbose,
        no_color: cli.no_color,
        file_dir: writes_log.then_some(log_dir),
    })?;
    if let Some(path) = &log_file {
        tracing::debug!(path = %path.display(), "Writing log file");
    }

    // CLI flags and env vars win over the config file
    let ctx = commands::Context {
        api_key: cli.api_key.or_else(|| config.api_key.clone()),
        profile_id: cli.profile_id.or_else(|| config.profile_id.clone()),
        base_url: cli.base_url.or_else(|| config.base_url.clone()),
        output_format,
        verbose: cli.verbose,
        config,
        config_path,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Sync(args) => commands::sync::execute(ctx, args).await,
        Commands::Submit(args) => commands::submit::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}
