//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use nextdns::ListKind;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Push curated domain lists to a NextDNS profile
///
/// Reads cleaned, one-domain-per-line files and adds every entry to the
/// profile's allowlist or denylist.
///
/// Find your API key at the bottom of: https://my.nextdns.io/account
#[derive(Parser, Debug)]
#[command(name = "nextdns-updater")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// NextDNS API key (or set NEXTDNS_API_KEY env var)
    #[arg(short = 'k', long, env = "NEXTDNS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// NextDNS profile ID (or set NEXTDNS_PROFILE_ID env var)
    #[arg(short = 'p', long = "profile", env = "NEXTDNS_PROFILE_ID", global = true)]
    pub profile_id: Option<String>,

    /// Override the API base URL
    #[arg(long, env = "NEXTDNS_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for run summaries
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log every request (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Do not write a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    /// Directory for the run log file
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit the configured allowlist and denylist files
    Sync(SyncArgs),

    /// Submit one file to one list
    Submit(SubmitArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Destination list as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    /// The profile allowlist
    #[value(alias = "allowlist")]
    Allow,
    /// The profile denylist
    #[value(aliases = ["denylist", "block", "blocklist"])]
    Deny,
}

impl From<ListArg> for ListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Allow => Self::Allowlist,
            ListArg::Deny => Self::Denylist,
        }
    }
}

/// Per-run overrides for the submission settings
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Domains per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Maximum requests in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Attempts per domain while rate limited
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Seconds to wait after a 429
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// Seconds to pause between batches
    #[arg(long, value_name = "SECS")]
    pub cooldown: Option<u64>,
}

// ============================================================================
// Sync command
// ============================================================================

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only run one pipeline
    #[arg(long, value_enum)]
    pub only: Option<ListArg>,

    /// Exit with an error if any domain was not submitted
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

// ============================================================================
// Submit command
// ============================================================================

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Destination list
    #[arg(value_enum)]
    pub list: ListArg,

    /// Cleaned domain file, one domain per line
    pub file: PathBuf,

    /// Exit with an error if any domain was not submitted
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., api_key, profile_id, batch_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_args() {
        let cli = Cli::try_parse_from([
            "nextdns-updater",
            "submit",
            "blocklist",
            "domains.txt",
            "--batch-size",
            "50",
            "--concurrency",
            "8",
            "-p",
            "abc123",
        ])
        .unwrap();

        assert_eq!(cli.profile_id.as_deref(), Some("abc123"));
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(ListKind::from(args.list), ListKind::Denylist);
                assert_eq!(args.file, PathBuf::from("domains.txt"));
                assert_eq!(args.tuning.batch_size, Some(50));
                assert_eq!(args.tuning.concurrency, Some(8));
                assert!(!args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_sync_only_allow() {
        let cli = Cli::try_parse_from(["nextdns-updater", "sync", "--only", "allow", "--strict"])
            .unwrap();
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.only, Some(ListArg::Allow));
                assert!(args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_list_rejected() {
        assert!(Cli::try_parse_from(["nextdns-updater", "submit", "grey", "f.txt"]).is_err());
    }
}
