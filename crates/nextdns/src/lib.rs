//! Keep NextDNS allowlists and denylists in sync with curated domain lists.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nextdns::{BatchSubmitter, FileSource, ListKind, NextDnsClient, SubmitConfig};
//!
//! #[tokio::main]
//! async fn main() -> nextdns::Result<()> {
//!     let client = NextDnsClient::new("your-api-key")?;
//!
//!     let submitter = BatchSubmitter::new(
//!         client.list("abc123", ListKind::Denylist),
//!         SubmitConfig::default().max_concurrency(10),
//!     )?;
//!
//!     let report = submitter
//!         .run(&FileSource::new("merged_blocked_domains.txt"))
//!         .await?;
//!
//!     println!("{} of {} submitted", report.summary.submitted, report.summary.total);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/nextdns/0.3.0")]

// Re-export core types
pub use nextdns_core::*;

// Re-export client
pub use nextdns_client::{api, NextDnsClient, NextDnsClientBuilder, ThrottleConfig};

// Re-export submission
pub use nextdns_sync::{
    submit_domain, BatchSubmitter, DomainSource, FileSource, SubmitConfig, SubmitReport,
    SyncError, SyncResult, VecSource,
};

// Re-export runtime for convenience
pub use tokio;
