use thiserror::Error;

/// Result type alias for NextDNS operations
pub type Result<T> = std::result::Result<T, NextDnsError>;

/// Errors that can occur when talking to the NextDNS API
#[derive(Error, Debug)]
pub enum NextDnsError {
    /// Authentication failed - invalid or missing API key
    #[error("authentication failed: invalid API key or profile access denied")]
    Unauthorized,

    /// Rate limit exceeded (HTTP 429)
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, when the server says so
        retry_after: Option<u64>,
    },

    /// Resource not found, usually an unknown profile ID
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// A domain entry was empty or contained whitespace
    #[error("invalid domain: {0:?}")]
    InvalidDomain(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl NextDnsError {
    /// Returns true if the server asked us to slow down.
    ///
    /// This is the only condition the batch submitter retries on.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_429_is_rate_limited() {
        assert!(NextDnsError::RateLimited { retry_after: None }.is_rate_limited());
        assert!(!NextDnsError::Timeout(30).is_rate_limited());
        assert!(!NextDnsError::Connection("reset".into()).is_rate_limited());
        assert!(!NextDnsError::Api {
            code: 503,
            message: String::new()
        }
        .is_rate_limited());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(NextDnsError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            NextDnsError::RateLimited { retry_after: Some(5) }.status_code(),
            Some(429)
        );
        assert_eq!(
            NextDnsError::Api {
                code: 500,
                message: "boom".into()
            }
            .status_code(),
            Some(500)
        );
        assert_eq!(NextDnsError::Http("dns".into()).status_code(), None);
    }
}
