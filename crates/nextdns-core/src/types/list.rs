use crate::{Domain, NextDnsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which profile list a pipeline writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Domains that are always resolved
    Allowlist,
    /// Domains that are always blocked
    Denylist,
}

impl ListKind {
    /// Both lists, in the order a full sync processes them
    pub const ALL: [Self; 2] = [Self::Allowlist, Self::Denylist];

    /// Path segment under `/profiles/{id}/`
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Allowlist => "allowlist",
            Self::Denylist => "denylist",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ListKind {
    type Err = NextDnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" | "allowlist" => Ok(Self::Allowlist),
            "deny" | "denylist" | "block" | "blocklist" => Ok(Self::Denylist),
            other => Err(NextDnsError::Config(format!(
                "unknown list {other:?}, expected allow or deny"
            ))),
        }
    }
}

/// Body of a list upsert: `{"id": "<domain>", "active": true}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// The domain
    pub id: String,
    /// Whether the entry is enabled
    pub active: bool,
}

impl ListEntry {
    /// An enabled entry for `domain`
    #[must_use]
    pub fn active(domain: &Domain) -> Self {
        Self {
            id: domain.as_str().to_string(),
            active: true,
        }
    }
}
