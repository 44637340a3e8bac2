//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use nextdns::{ListKind, SubmitConfig, ThrottleConfig};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// NextDNS API key.
    pub api_key: Option<String>,

    /// NextDNS profile ID.
    pub profile_id: Option<String>,

    /// API base URL, for proxies and tests.
    pub base_url: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Directory for run log files (default: current directory).
    pub log_dir: Option<PathBuf>,

    /// Submission tuning.
    #[serde(default)]
    pub submit: SubmitSettings,

    /// Cleaned input files per list.
    #[serde(default)]
    pub files: FileSettings,
}

/// Submission tuning as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitSettings {
    pub batch_size: usize,
    pub max_concurrency: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub cooldown_secs: u64,
    pub request_timeout_secs: u64,
    /// Client-side request cap; unset means no throttle.
    pub requests_per_second: Option<u32>,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        let defaults = SubmitConfig::default();
        Self {
            batch_size: defaults.batch_size,
            max_concurrency: defaults.max_concurrency,
            max_retries: defaults.max_retries,
            retry_delay_secs: defaults.retry_delay.as_secs(),
            cooldown_secs: defaults.cooldown.as_secs(),
            request_timeout_secs: 30,
            requests_per_second: None,
        }
    }
}

impl SubmitSettings {
    /// Library configuration for the batch submitter
    #[must_use]
    pub const fn submit_config(&self) -> SubmitConfig {
        SubmitConfig::new()
            .batch_size(self.batch_size)
            .max_concurrency(self.max_concurrency)
            .max_retries(self.max_retries)
            .retry_delay(Duration::from_secs(self.retry_delay_secs))
            .cooldown(Duration::from_secs(self.cooldown_secs))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Evenly spaced requests, no burst. `None` or 0 disables the throttle.
    #[must_use]
    pub fn throttle(&self) -> Option<ThrottleConfig> {
        self.requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rate| ThrottleConfig::per_second(rate).burst(NonZeroU32::MIN))
    }
}

/// Cleaned domain files, one per list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub allowlist: PathBuf,
    pub denylist: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            allowlist: PathBuf::from("merged_allowed_domains.txt"),
            denylist: PathBuf::from("merged_blocked_domains.txt"),
        }
    }
}

impl FileSettings {
    /// Input file for `kind`
    #[must_use]
    pub fn for_list(&self, kind: ListKind) -> &Path {
        match kind {
            ListKind::Allowlist => &self.allowlist,
            ListKind::Denylist => &self.denylist,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "nextdns-updater", "nextdns-updater")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Update one setting by name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_key" => self.api_key = Some(value.to_string()),
            "profile_id" | "profile" => self.profile_id = Some(value.to_string()),
            "base_url" => self.base_url = Some(value.to_string()),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "log_dir" => self.log_dir = Some(PathBuf::from(value)),
            "batch_size" => self.submit.batch_size = value.parse()?,
            "max_concurrency" | "concurrency" => self.submit.max_concurrency = value.parse()?,
            "max_retries" => self.submit.max_retries = value.parse()?,
            "retry_delay_secs" => self.submit.retry_delay_secs = value.parse()?,
            "cooldown_secs" => self.submit.cooldown_secs = value.parse()?,
            "request_timeout_secs" => self.submit.request_timeout_secs = value.parse()?,
            "requests_per_second" => self.submit.requests_per_second = Some(value.parse()?),
            "allowlist_file" => self.files.allowlist = PathBuf::from(value),
            "denylist_file" => self.files.denylist = PathBuf::from(value),
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 api_key, profile_id, base_url, output_format, log_dir,\n  \
                 batch_size, max_concurrency, max_retries, retry_delay_secs,\n  \
                 cooldown_secs, request_timeout_secs, requests_per_second,\n  \
                 allowlist_file, denylist_file",
                key
            ),
        }
        Ok(())
    }
}
