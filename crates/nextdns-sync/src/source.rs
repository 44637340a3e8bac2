//! Where the domains come from.

use crate::{SyncError, SyncResult};
use nextdns_core::Domain;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Provides the ordered list of domains for one run.
pub trait DomainSource {
    /// Load every domain, in submission order
    fn load(&self) -> SyncResult<Vec<Domain>>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

/// A cleaned list file with one domain per line.
///
/// Blank lines are skipped. A line holding several whitespace-separated
/// names yields each of them in turn. Order and duplicates are preserved.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Read domains from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the list file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DomainSource for FileSource {
    fn load(&self) -> SyncResult<Vec<Domain>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SyncError::Source {
            path: self.path.clone(),
            source,
        })?;

        let domains = parse_lines(&content);
        info!(
            path = %self.path.display(),
            domains = domains.len(),
            "Loaded domain list"
        );
        Ok(domains)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory list.
#[derive(Debug, Clone, Default)]
pub struct VecSource(pub Vec<Domain>);

impl DomainSource for VecSource {
    fn load(&self) -> SyncResult<Vec<Domain>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory domains", self.0.len())
    }
}

fn parse_lines(content: &str) -> Vec<Domain> {
    let mut domains = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.peek().is_none() {
            debug!(line = number + 1, "Skipped empty line");
            continue;
        }
        // split_whitespace never yields an empty or spaced token
        domains.extend(tokens.filter_map(|t| Domain::parse(t).ok()));
    }
    domains
}
