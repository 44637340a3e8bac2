//! Client configuration types.

use std::num::NonZeroU32;

/// Client-side request throttle.
///
/// Caps how fast the client issues requests regardless of how many
/// submission tasks are running. Off unless configured on the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Sustained requests per second
    pub requests_per_second: NonZeroU32,

    /// Requests allowed back to back before the rate applies
    pub burst: NonZeroU32,
}

impl ThrottleConfig {
    /// A throttle of `per_second` requests with an equal burst
    #[must_use]
    pub const fn per_second(per_second: NonZeroU32) -> Self {
        Self {
            requests_per_second: per_second,
            burst: per_second,
        }
    }

    /// Set the burst size
    #[must_use]
    pub const fn burst(mut self, burst: NonZeroU32) -> Self {
        self.burst = burst;
        self
    }
}
