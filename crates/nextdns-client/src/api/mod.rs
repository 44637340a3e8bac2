//! API endpoint modules.

mod lists;

pub use lists::ListApi;
