//! # nextdns-cli
//!
//! Command-line updater that pushes curated domain lists to NextDNS.
//!
//! ## Features
//!
//! - **Both pipelines in one run**: allowlist first, then denylist
//! - **Batched submission**: fixed cool-down between batches, bounded
//!   concurrency within a batch, constant back-off on HTTP 429
//! - **Logs to console and file**: one timestamped log file per run
//! - **Run summaries**: pretty or JSON, with `--strict` exit codes for cron

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
