//! Core types and errors for the NextDNS list updater.
//!
//! This crate provides the foundational types shared by the client, the
//! batch submitter and the CLI:
//!
//! - **Types**: list kinds, domains, request bodies and submission reports
//! - **Errors**: the API error taxonomy with [`NextDnsError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use nextdns_core::{Domain, ListEntry, ListKind};
//!
//! let domain = Domain::parse("ads.example.com")?;
//! let body = ListEntry::active(&domain);
//! assert_eq!(ListKind::Denylist.path_segment(), "denylist");
//! ```

#![doc(html_root_url = "https://docs.rs/nextdns-core/0.3.0")]

mod error;
pub mod types;

pub use error::{NextDnsError, Result};
pub use types::*;
