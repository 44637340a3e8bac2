use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sync operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Errors that stop a run before any domain is submitted.
///
/// Per-domain failures never surface here; they end up in the run report.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The domain list could not be read
    #[error("failed to read domain list {}: {source}", .path.display())]
    Source {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Submission settings are unusable
    #[error("invalid submit configuration: {0}")]
    InvalidConfig(String),
}
