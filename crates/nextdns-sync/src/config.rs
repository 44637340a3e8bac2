//! Submission tuning.

use crate::{SyncError, SyncResult};
use std::time::Duration;
use tokio::sync::Semaphore;

/// How a run is chunked, paced and retried.
///
/// Batch size and concurrency are independent: a batch of 100 domains with
/// a ceiling of 5 keeps at most 5 requests in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Domains per batch
    pub batch_size: usize,

    /// Maximum requests in flight at once
    pub max_concurrency: usize,

    /// Total attempts per domain when the API keeps answering 429
    pub max_retries: u32,

    /// Constant wait after a 429 before the next attempt
    pub retry_delay: Duration,

    /// Pause between consecutive batches
    pub cooldown: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitConfig {
    /// Defaults: batches of 5, 5 workers, 5 tries, 5s retry delay, 1s cool-down
    #[must_use]
    pub const fn new() -> Self {
        Self {
            batch_size: 5,
            max_concurrency: 5,
            max_retries: 5,
            retry_delay: Duration::from_secs(5),
            cooldown: Duration::from_secs(1),
        }
    }

    /// Set the batch size
    #[must_use]
    pub const fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the concurrency ceiling
    #[must_use]
    pub const fn max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = workers;
        self
    }

    /// Set the maximum attempts per domain
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the delay after a rate-limited attempt
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the pause between batches
    #[must_use]
    pub const fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Reject settings that would submit nothing or never finish
    pub fn validate(&self) -> SyncResult<()> {
        if self.batch_size == 0 {
            return Err(SyncError::InvalidConfig("batch size must be at least 1".into()));
        }
        if self.max_concurrency == 0 {
            return Err(SyncError::InvalidConfig(
                "max concurrency must be at least 1".into(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(SyncError::InvalidConfig(format!(
                "max concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.max_retries == 0 {
            return Err(SyncError::InvalidConfig("max retries must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SubmitConfig::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.cooldown, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(SubmitConfig::new().batch_size(0).validate().is_err());
        assert!(SubmitConfig::new().max_concurrency(0).validate().is_err());
        assert!(SubmitConfig::new().max_retries(0).validate().is_err());
    }

    #[test]
    fn test_concurrency_above_permit_limit_rejected() {
        let err = SubmitConfig::new()
            .max_concurrency(usize::MAX)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("at most"));
        assert!(SubmitConfig::new()
            .max_concurrency(Semaphore::MAX_PERMITS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_default_pauses_every_five_domains() {
        let config = SubmitConfig::default();
        assert_eq!(nextdns_core::batch_count(10, config.batch_size), 2);
        assert_eq!(config.batch_size, config.max_concurrency);
    }
}
