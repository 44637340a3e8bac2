use crate::{NextDnsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single DNS name to allow or deny.
///
/// The value is whatever the cleaning stage produced. Only the shape
/// (non-empty, one token) is checked here; the name itself is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Parse one line of a domain list.
    ///
    /// Surrounding whitespace is trimmed. Empty lines and lines containing
    /// more than one token are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(NextDnsError::InvalidDomain(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The domain as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
