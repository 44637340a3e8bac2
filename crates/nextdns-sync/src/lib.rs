//! Batched submission of domain lists to NextDNS.
//!
//! A run reads an ordered list of domains from a [`DomainSource`], splits it
//! into batches, and POSTs every domain of a batch concurrently (bounded by
//! a separate concurrency ceiling). Rate-limited requests are retried after a
//! fixed delay; every other failure is logged and the domain abandoned.
//! Batches are separated by a fixed cool-down.
//!
//! ```rust,ignore
//! use nextdns_client::NextDnsClient;
//! use nextdns_core::ListKind;
//! use nextdns_sync::{BatchSubmitter, FileSource, SubmitConfig};
//!
//! let client = NextDnsClient::new(api_key)?;
//! let submitter = BatchSubmitter::new(
//!     client.list(profile_id, ListKind::Denylist),
//!     SubmitConfig::default(),
//! )?;
//! let report = submitter.run(&FileSource::new("merged_blocked_domains.txt")).await?;
//! println!("{} submitted", report.summary.submitted);
//! ```

#![doc(html_root_url = "https://docs.rs/nextdns-sync/0.3.0")]

mod config;
mod error;
mod source;
mod submitter;

pub use config::SubmitConfig;
pub use error::{SyncError, SyncResult};
pub use source::{DomainSource, FileSource, VecSource};
pub use submitter::{submit_domain, BatchSubmitter, SubmitReport};
