//! Main NextDNS API client implementation.

use crate::api::ListApi;
use crate::config::ThrottleConfig;
use governor::{Quota, RateLimiter};
use nextdns_core::{ListKind, NextDnsError, Result};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The NextDNS API base URL
const DEFAULT_BASE_URL: &str = "https://api.nextdns.io";

/// Default request timeout. A hung connection gives up after this long.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sent with every request
const USER_AGENT: &str = concat!("nextdns-updater/", env!("CARGO_PKG_VERSION"));

/// Header carrying the account API key
const API_KEY_HEADER: &str = "X-Api-Key";

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Main NextDNS API client.
///
/// Cheap to clone; all clones share one connection pool, API key and
/// throttle.
#[derive(Clone)]
pub struct NextDnsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
    throttle: Option<DirectLimiter>,
}

impl std::fmt::Debug for NextDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextDnsClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("throttled", &self.inner.throttle.is_some())
            .finish_non_exhaustive()
    }
}

impl NextDnsClient {
    /// Create a new client with the given API key using default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        NextDnsClientBuilder::new(api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> NextDnsClientBuilder {
        NextDnsClientBuilder::new(api_key)
    }

    /// Access one list of a profile
    #[must_use]
    pub fn list(&self, profile_id: impl Into<String>, kind: ListKind) -> ListApi {
        ListApi::new(self.clone(), profile_id.into(), kind)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform a POST request with a JSON body.
    ///
    /// Returns the response body on 2xx, or `None` when the body is empty.
    pub(crate) async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>> {
        if let Some(limiter) = &self.inner.throttle {
            limiter.until_ready().await;
        }

        let url = self.build_url(path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        self.handle_response(response).await
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn transport_error(&self, err: &reqwest::Error) -> NextDnsError {
        if err.is_timeout() {
            NextDnsError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            NextDnsError::Connection(err.to_string())
        } else {
            NextDnsError::Http(err.to_string())
        }
    }

    /// Handle an API response, keeping the raw body on success
    async fn handle_response(&self, response: reqwest::Response) -> Result<Option<String>> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| self.transport_error(&e))?;
            Ok(if body.trim().is_empty() { None } else { Some(body) })
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a `NextDnsError`
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or(body);

        match status {
            401 | 403 => Err(NextDnsError::Unauthorized),
            404 => Err(NextDnsError::NotFound { resource: message }),
            429 => {
                warn!(?retry_after, "Rate limited by NextDNS API");
                Err(NextDnsError::RateLimited { retry_after })
            }
            _ => Err(NextDnsError::Api {
                code: status,
                message,
            }),
        }
    }
}

/// Pull a readable message out of an error body.
///
/// NextDNS answers `{"errors": [{"code": "...", "detail": "..."}]}`; older
/// endpoints use `{"error": "..."}`.
fn error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(first) = value.get("errors").and_then(|e| e.get(0)) {
        let text = first
            .get("detail")
            .or_else(|| first.get("code"))
            .and_then(serde_json::Value::as_str);
        if let Some(text) = text {
            return Some(text.to_string());
        }
    }

    value.get("error").and_then(|e| e.as_str()).map(String::from)
}

/// Builder for configuring a [`NextDnsClient`]
#[derive(Debug)]
pub struct NextDnsClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    throttle: Option<ThrottleConfig>,
}

impl NextDnsClientBuilder {
    /// Create a new builder with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            throttle: None,
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Throttle outgoing requests
    #[must_use]
    pub const fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<NextDnsClient> {
        if self.api_key.trim().is_empty() {
            return Err(NextDnsError::Config("API key is empty".into()));
        }

        let base_url = url::Url::parse(&self.base_url)
            .map_err(|e| NextDnsError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| NextDnsError::Config("API key contains invalid characters".into()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| NextDnsError::Internal(format!("failed to build HTTP client: {e}")))?;

        let throttle = self.throttle.map(|t| {
            RateLimiter::direct(Quota::per_second(t.requests_per_second).allow_burst(t.burst))
        });

        Ok(NextDnsClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                timeout: self.timeout,
                throttle,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"errors":[{"code":"invalid","detail":"bad domain"}]}"#),
            Some("bad domain".into())
        );
        assert_eq!(
            error_message(r#"{"errors":[{"code":"notFound"}]}"#),
            Some("notFound".into())
        );
        assert_eq!(error_message(r#"{"error":"nope"}"#), Some("nope".into()));
        assert_eq!(error_message("plain text"), None);
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        let err = NextDnsClient::builder("  ").build().unwrap_err();
        assert!(matches!(err, NextDnsError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = NextDnsClient::builder("key")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, NextDnsError::InvalidUrl(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = NextDnsClient::builder("key")
            .base_url("http://127.0.0.1:9999/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }
}
