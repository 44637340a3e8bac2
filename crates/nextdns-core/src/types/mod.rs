//! Types shared across the updater.

mod domain;
mod list;
mod report;

pub use domain::*;
pub use list::*;
pub use report::*;
