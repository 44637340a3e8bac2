//! Command implementations.

pub mod config;
pub mod submit;
pub mod sync;

use anyhow::Result;
use nextdns::{BatchSubmitter, DomainSource, FileSource, ListKind, NextDnsClient, SubmitConfig};
use std::path::PathBuf;
use tracing::info;

use super::args::TuningArgs;
use crate::config::Config;
use crate::output::{self, OutputFormat};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// NextDNS API key
    pub api_key: Option<String>,

    /// NextDNS profile ID
    pub profile_id: Option<String>,

    /// API base URL override
    pub base_url: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Loaded configuration file
    pub config: Config,

    /// Where `config` was loaded from
    pub config_path: PathBuf,
}

impl Context {
    /// Get the API key, returning an error if not set.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "API key required.\n\n\
                     Set it with one of:\n  \
                     1. --api-key <KEY>\n  \
                     2. NEXTDNS_API_KEY environment variable\n  \
                     3. nextdns-updater config set api_key <KEY>\n\n\
                     Find your key at: https://my.nextdns.io/account"
                )
            })
    }

    /// Get the profile ID, returning an error if not set.
    pub fn require_profile_id(&self) -> anyhow::Result<&str> {
        self.profile_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Profile ID required.\n\n\
                     Set it with one of:\n  \
                     1. --profile <ID>\n  \
                     2. NEXTDNS_PROFILE_ID environment variable\n  \
                     3. nextdns-updater config set profile_id <ID>"
                )
            })
    }

    /// Create a NextDNS client with the configured key and settings.
    pub fn client(&self) -> anyhow::Result<NextDnsClient> {
        let key = self.require_api_key()?;
        let settings = &self.config.submit;

        let mut builder = NextDnsClient::builder(key).timeout(settings.request_timeout());
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(throttle) = settings.throttle() {
            builder = builder.throttle(throttle);
        }

        Ok(builder.build()?)
    }

    /// Submission settings from the config file with per-run overrides.
    #[must_use]
    pub fn submit_config(&self, tuning: &TuningArgs) -> SubmitConfig {
        let mut config = self.config.submit.submit_config();
        if let Some(size) = tuning.batch_size {
            config = config.batch_size(size);
        }
        if let Some(workers) = tuning.concurrency {
            config = config.max_concurrency(workers);
        }
        if let Some(retries) = tuning.max_retries {
            config = config.max_retries(retries);
        }
        if let Some(secs) = tuning.retry_delay {
            config = config.retry_delay(std::time::Duration::from_secs(secs));
        }
        if let Some(secs) = tuning.cooldown {
            config = config.cooldown(std::time::Duration::from_secs(secs));
        }
        config
    }
}

/// Submit each `(list, file)` pair in order and print the summaries.
///
/// Every file is read before the first request, so a missing file aborts
/// the whole run without touching the API.
pub(crate) async fn submit_lists(
    ctx: &Context,
    plan: Vec<(ListKind, PathBuf)>,
    tuning: &TuningArgs,
    strict: bool,
) -> Result<()> {
    let client = ctx.client()?;
    let profile_id = ctx.require_profile_id()?;
    let config = ctx.submit_config(tuning);

    let mut loaded = Vec::with_capacity(plan.len());
    for (kind, path) in plan {
        let submitter = BatchSubmitter::new(client.list(profile_id, kind), config.clone())?;
        let domains = FileSource::new(path).load()?;
        loaded.push((submitter, domains));
    }

    let mut summaries = Vec::with_capacity(loaded.len());
    for (submitter, domains) in loaded {
        let report = submitter.submit_all(domains).await;
        summaries.push(report.summary);
    }

    output::print_summaries(&summaries, ctx.output_format)?;

    let unsubmitted: usize = summaries.iter().map(|s| s.failed + s.exhausted).sum();
    if unsubmitted > 0 {
        info!(unsubmitted, "Some domains were not submitted, see log for details");
        if strict {
            anyhow::bail!("{unsubmitted} domain(s) were not submitted");
        }
    }

    Ok(())
}
