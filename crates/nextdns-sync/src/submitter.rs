//! Batch submitter: chunking, bounded concurrency, 429 retry, cool-down.

use crate::{DomainSource, SubmitConfig, SyncResult};
use futures_util::future::join_all;
use nextdns_client::api::ListApi;
use nextdns_core::{batch_count, Domain, DomainReport, RunSummary, SubmitOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct SubmitReport {
    /// Aggregate counts
    pub summary: RunSummary,
    /// One entry per input domain, in input order
    pub domains: Vec<DomainReport>,
}

impl SubmitReport {
    /// First report for `domain`, if it was part of the run
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&DomainReport> {
        self.domains.iter().find(|r| r.domain.as_str() == domain)
    }
}

/// Submits a domain list to one NextDNS list.
#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    list: ListApi,
    config: SubmitConfig,
}

impl BatchSubmitter {
    /// Create a submitter writing to `list`
    pub fn new(list: ListApi, config: SubmitConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self { list, config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Load domains from `source` and submit them all.
    ///
    /// Fails only if the source cannot be read.
    pub async fn run<S: DomainSource + ?Sized>(&self, source: &S) -> SyncResult<SubmitReport> {
        info!(source = %source.describe(), list = %self.list.kind(), "Reading domain list");
        let domains = source.load()?;
        Ok(self.submit_all(domains).await)
    }

    /// Submit every domain, batch by batch.
    ///
    /// Batches run strictly in order. Within a batch every domain gets its
    /// own task, gated by the concurrency ceiling; the next batch starts only
    /// after all of them finished and the cool-down elapsed.
    pub async fn submit_all(&self, domains: Vec<Domain>) -> SubmitReport {
        let started = Instant::now();
        let total = domains.len();
        let batches = batch_count(total, self.config.batch_size);
        let mut summary = RunSummary::new(Some(self.list.kind()), total, batches);
        let mut reports = Vec::with_capacity(total);

        info!(
            list = %self.list.kind(),
            endpoint = %self.list.endpoint(),
            domains = total,
            batches,
            "Started submitting domains"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));

        for (index, batch) in domains.chunks(self.config.batch_size).enumerate() {
            if index > 0 && !self.config.cooldown.is_zero() {
                debug!(cooldown = ?self.config.cooldown, "Cooling down between batches");
                tokio::time::sleep(self.config.cooldown).await;
            }

            debug!(
                batch = index + 1,
                batches,
                size = batch.len(),
                workers = self.config.max_concurrency.min(batch.len()),
                "Starting batch"
            );

            let batch_reports = self.submit_batch(batch, &semaphore).await;
            for report in &batch_reports {
                summary.record(report);
            }
            reports.extend(batch_reports);
        }

        summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            list = %self.list.kind(),
            submitted = summary.submitted,
            failed = summary.failed,
            exhausted = summary.exhausted,
            elapsed_ms = summary.elapsed_ms,
            "Finished submitting domains"
        );

        SubmitReport {
            summary,
            domains: reports,
        }
    }

    async fn submit_batch(&self, batch: &[Domain], semaphore: &Arc<Semaphore>) -> Vec<DomainReport> {
        let (domains, handles): (Vec<_>, Vec<_>) = batch
            .iter()
            .map(|domain| {
                let list = self.list.clone();
                let config = self.config.clone();
                let permits = Arc::clone(semaphore);
                let task_domain = domain.clone();

                let handle = tokio::spawn(async move {
                    // The semaphore is never closed, so acquire cannot fail.
                    let _permit = permits.acquire_owned().await.ok();
                    submit_domain(&list, &task_domain, &config).await
                });

                (domain.clone(), handle)
            })
            .unzip();

        join_all(handles)
            .await
            .into_iter()
            .zip(domains)
            .map(|(joined, domain)| match joined {
                Ok(report) => report,
                Err(e) => {
                    error!(domain = %domain, error = %e, "Submission task aborted");
                    DomainReport {
                        domain,
                        attempts: 0,
                        outcome: SubmitOutcome::Failed {
                            reason: format!("task aborted: {e}"),
                        },
                    }
                }
            })
            .collect()
    }
}

/// Submit one domain, retrying only while the API answers 429.
///
/// At most `config.max_retries` requests are made. Any other error ends the
/// domain immediately.
#[instrument(skip_all, fields(domain = %domain))]
pub async fn submit_domain(list: &ListApi, domain: &Domain, config: &SubmitConfig) -> DomainReport {
    let mut attempts = 0;

    let outcome = loop {
        attempts += 1;
        debug!(attempt = attempts, "Submitting domain");

        match list.add(domain).await {
            Ok(Some(body)) => {
                info!(response = %body, "Domain submitted successfully");
                break SubmitOutcome::Submitted {
                    confirmation: Some(body),
                };
            }
            Ok(None) => {
                warn!("Empty response received");
                break SubmitOutcome::Submitted { confirmation: None };
            }
            Err(e) if e.is_rate_limited() => {
                if attempts >= config.max_retries {
                    error!(attempts, "Max retries reached, giving up");
                    break SubmitOutcome::RetriesExhausted;
                }
                warn!(retry = attempts, "Retry #{attempts} after encountering 429");
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(e) => {
                error!(error = %e, "Error submitting domain");
                break SubmitOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }
    };

    DomainReport {
        domain: domain.clone(),
        attempts,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSource, SyncError, VecSource};
    use nextdns_client::NextDnsClient;
    use nextdns_core::ListKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tracing::instrument::WithSubscriber;
    use tracing_subscriber::fmt::MakeWriter;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const PROFILE: &str = "abc123";
    const DENYLIST: &str = "/profiles/abc123/denylist";

    fn fast_config() -> SubmitConfig {
        SubmitConfig::new()
            .retry_delay(Duration::from_millis(10))
            .cooldown(Duration::ZERO)
    }

    fn submitter(server: &MockServer, config: SubmitConfig) -> BatchSubmitter {
        let client = NextDnsClient::builder("test-key")
            .base_url(server.uri())
            .build()
            .unwrap();
        BatchSubmitter::new(client.list(PROFILE, ListKind::Denylist), config).unwrap()
    }

    fn domains(names: &[&str]) -> Vec<Domain> {
        names.iter().map(|n| Domain::parse(n).unwrap()).collect()
    }

    /// Collects formatted log lines emitted while a future runs.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::INFO)
                .finish()
        }

        fn count(&self, needle: &str) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains(needle))
                .count()
        }
    }

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const RETRY_LOG: &str = "after encountering 429";
    const SUCCESS_LOG: &str = "Domain submitted successfully";
    const EXHAUSTED_LOG: &str = "Max retries reached";

    #[tokio::test]
    async fn test_three_domains_in_two_batches() {
        let server = MockServer::start().await;
        for name in ["a.com", "b.com", "c.com"] {
            Mock::given(method("POST"))
                .and(path(DENYLIST))
                .and(header("X-Api-Key", "test-key"))
                .and(header("Content-Type", "application/json"))
                .and(body_json(serde_json::json!({"id": name, "active": true})))
                .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#))
                .expect(1)
                .mount(&server)
                .await;
        }

        let config = fast_config()
            .batch_size(2)
            .cooldown(Duration::from_millis(200));
        let started = Instant::now();
        let report = submitter(&server, config)
            .submit_all(domains(&["a.com", "b.com", "c.com"]))
            .await;

        // One cool-down between the two batches.
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(report.summary.batches, 2);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.submitted, 3);
        assert_eq!(report.summary.attempts, 3);
        assert!(report.summary.is_clean());

        let order: Vec<&str> = report.domains.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(order, vec!["a.com", "b.com", "c.com"]);
    }

    #[tokio::test]
    async fn test_rate_limited_forever_makes_exactly_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config().max_retries(3))
            .submit_all(domains(&["slow.test"]))
            .await;

        let domain = report.get("slow.test").unwrap();
        assert_eq!(domain.attempts, 3);
        assert_eq!(domain.outcome, SubmitOutcome::RetriesExhausted);
        assert_eq!(report.summary.exhausted, 1);
        assert_eq!(report.summary.submitted, 0);
    }

    #[tokio::test]
    async fn test_success_after_three_rate_limits() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({"id": "x.test", "active": true})))
            .respond_with(move |_req: &Request| -> ResponseTemplate {
                if calls_clone.fetch_add(1, Ordering::SeqCst) < 3 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(200).set_body_string(r#"{"data":{"id":"x.test"}}"#)
                }
            })
            .expect(4)
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config().max_retries(5))
            .submit_all(domains(&["x.test"]))
            .await;

        let domain = report.get("x.test").unwrap();
        assert_eq!(domain.attempts, 4);
        assert!(domain.outcome.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(report.summary.exhausted, 0);
    }

    #[tokio::test]
    async fn test_retry_warnings_then_single_success_log() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        Mock::given(method("POST"))
            .respond_with(move |_req: &Request| -> ResponseTemplate {
                if calls_clone.fetch_add(1, Ordering::SeqCst) < 3 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(200).set_body_string(r#"{"data":{"id":"x.test"}}"#)
                }
            })
            .expect(4)
            .mount(&server)
            .await;

        let submitter = submitter(&server, fast_config().max_retries(5));
        let logs = LogCapture::default();
        let report = submit_domain(&submitter.list, &domains(&["x.test"])[0], submitter.config())
            .with_subscriber(logs.subscriber())
            .await;

        assert_eq!(report.attempts, 4);
        assert_eq!(logs.count(RETRY_LOG), 3);
        assert_eq!(logs.count("Retry #3 "), 1);
        assert_eq!(logs.count(SUCCESS_LOG), 1);
        assert_eq!(logs.count(EXHAUSTED_LOG), 0);
    }

    #[tokio::test]
    async fn test_exhausted_domain_logs_no_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let submitter = submitter(&server, fast_config().max_retries(3));
        let logs = LogCapture::default();
        let report = submit_domain(&submitter.list, &domains(&["slow.test"])[0], submitter.config())
            .with_subscriber(logs.subscriber())
            .await;

        assert_eq!(report.outcome, SubmitOutcome::RetriesExhausted);
        // No warning for the final 429, it ends the domain instead.
        assert_eq!(logs.count(RETRY_LOG), 2);
        assert_eq!(logs.count(EXHAUSTED_LOG), 1);
        assert_eq!(logs.count(SUCCESS_LOG), 0);
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config())
            .submit_all(domains(&["broken.test"]))
            .await;

        let domain = report.get("broken.test").unwrap();
        assert_eq!(domain.attempts, 1);
        assert!(matches!(domain.outcome, SubmitOutcome::Failed { .. }));
        assert_eq!(report.summary.failed, 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = NextDnsClient::builder("key")
            .base_url(format!("http://{addr}"))
            .build()
            .unwrap();
        let list = client.list(PROFILE, ListKind::Allowlist);
        let domain = Domain::parse("offline.test").unwrap();

        let report = submit_domain(&list, &domain, &fast_config()).await;
        assert_eq!(report.attempts, 1);
        assert!(matches!(report.outcome, SubmitOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_empty_body_is_still_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config())
            .submit_all(domains(&["quiet.test"]))
            .await;

        assert_eq!(
            report.get("quiet.test").unwrap().outcome,
            SubmitOutcome::Submitted { confirmation: None }
        );
        assert_eq!(report.summary.empty_responses, 1);
    }

    #[tokio::test]
    async fn test_concurrency_ceiling_is_independent_of_batch_size() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .expect(6)
            .mount(&server)
            .await;

        let config = fast_config().batch_size(6).max_concurrency(2);
        let started = Instant::now();
        let report = submitter(&server, config)
            .submit_all(domains(&["1.test", "2.test", "3.test", "4.test", "5.test", "6.test"]))
            .await;

        // Six 100ms requests, two at a time, need at least three rounds.
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(report.summary.batches, 1);
        assert_eq!(report.summary.submitted, 6);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({"id": "bad.test", "active": true})))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({"id": "good.test", "active": true})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config().batch_size(1))
            .submit_all(domains(&["bad.test", "good.test"]))
            .await;

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.submitted, 1);
        assert_eq!(report.summary.batches, 2);
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let report = submitter(&server, fast_config())
            .run(&VecSource::default())
            .await
            .unwrap();
        assert_eq!(report.summary.batches, 0);
        assert!(report.domains.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_source_is_fatal() {
        let server = MockServer::start().await;
        let err = submitter(&server, fast_config())
            .run(&FileSource::new("/tmp/nonexistent_nextdns_submit_test.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Source { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let client = NextDnsClient::new("key").unwrap();
        let result = BatchSubmitter::new(
            client.list(PROFILE, ListKind::Denylist),
            SubmitConfig::new().max_concurrency(0),
        );
        assert!(matches!(result, Err(SyncError::InvalidConfig(_))));
    }
}
