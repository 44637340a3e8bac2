//! HTTP client for the NextDNS API.
//!
//! This crate provides [`NextDnsClient`] for writing entries to a profile's
//! allowlist and denylist.

#![doc(html_root_url = "https://docs.rs/nextdns-client/0.3.0")]

mod client;
mod config;
pub mod api;

pub use client::{NextDnsClient, NextDnsClientBuilder};
pub use config::*;
pub use nextdns_core::{NextDnsError, Result};
