use crate::{Domain, ListKind};
use serde::{Deserialize, Serialize};

/// Terminal state of one domain for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The API answered 2xx. `confirmation` holds the body, `None` if empty.
    Submitted {
        /// Response body returned by the API
        confirmation: Option<String>,
    },
    /// Any error other than a rate limit. Never retried.
    Failed {
        /// Human-readable cause
        reason: String,
    },
    /// Every attempt was answered with 429.
    RetriesExhausted,
}

impl SubmitOutcome {
    /// True for both flavours of success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

/// What happened to a single domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainReport {
    /// The domain submitted
    pub domain: Domain,
    /// Number of POST requests issued
    pub attempts: u32,
    /// How it ended
    pub outcome: SubmitOutcome,
}

/// Aggregate counts for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Destination list, if known
    pub list: Option<ListKind>,
    /// Domains read from the source
    pub total: usize,
    /// Domains accepted by the API
    pub submitted: usize,
    /// Subset of `submitted` that came back with an empty body
    pub empty_responses: usize,
    /// Non-retryable failures
    pub failed: usize,
    /// Domains that ran out of retries
    pub exhausted: usize,
    /// Number of batches dispatched
    pub batches: usize,
    /// Total POST requests issued
    pub attempts: u64,
    /// Wall clock time in milliseconds
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Start an empty summary for `list`
    #[must_use]
    pub fn new(list: Option<ListKind>, total: usize, batches: usize) -> Self {
        Self {
            list,
            total,
            batches,
            ..Self::default()
        }
    }

    /// Fold one domain report into the counts
    pub fn record(&mut self, report: &DomainReport) {
        self.attempts += u64::from(report.attempts);
        match &report.outcome {
            SubmitOutcome::Submitted { confirmation } => {
                self.submitted += 1;
                if confirmation.is_none() {
                    self.empty_responses += 1;
                }
            }
            SubmitOutcome::Failed { .. } => self.failed += 1,
            SubmitOutcome::RetriesExhausted => self.exhausted += 1,
        }
    }

    /// True when no domain failed or exhausted its retries
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && self.exhausted == 0
    }
}

/// Number of batches needed for `total` items in chunks of `batch_size`.
///
/// Returns 0 for an empty input or a zero batch size.
#[must_use]
pub const fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(domain: &str, attempts: u32, outcome: SubmitOutcome) -> DomainReport {
        DomainReport {
            domain: Domain::parse(domain).unwrap(),
            attempts,
            outcome,
        }
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 10), 0);
        assert_eq!(batch_count(3, 2), 2);
        assert_eq!(batch_count(4, 2), 2);
        assert_eq!(batch_count(2001, 1000), 3);
        assert_eq!(batch_count(5, 0), 0);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new(Some(ListKind::Denylist), 4, 2);
        summary.record(&report(
            "a.com",
            1,
            SubmitOutcome::Submitted {
                confirmation: Some("{}".into()),
            },
        ));
        summary.record(&report("b.com", 2, SubmitOutcome::Submitted { confirmation: None }));
        summary.record(&report(
            "c.com",
            1,
            SubmitOutcome::Failed {
                reason: "500".into(),
            },
        ));
        summary.record(&report("d.com", 5, SubmitOutcome::RetriesExhausted));

        assert_eq!(summary.submitted, 2);
        assert_eq!(summary.empty_responses, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exhausted, 1);
        assert_eq!(summary.attempts, 9);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(SubmitOutcome::RetriesExhausted).unwrap();
        assert_eq!(json, serde_json::json!({"status": "retries_exhausted"}));
    }
}
