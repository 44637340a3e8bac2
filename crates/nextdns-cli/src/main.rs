//! nextdns-updater - push curated domain lists to NextDNS
//!
//! Runs the allowlist and denylist pipelines once and exits.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    nextdns_cli::run().await
}
