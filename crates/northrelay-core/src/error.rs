//! Errors raised while constructing retry configuration.

use std::time::Duration;
use thiserror::Error;

/// A retry policy could not be built because its parameters are inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// The backoff multiplier must be a finite number no smaller than 1.
    #[error("backoff multiplier must be >= 1.0, got {0}")]
    InvalidMultiplier(f64),

    /// The initial delay is larger than the delay cap.
    #[error("initial delay {initial:?} exceeds max delay {max:?}")]
    DelayOutOfRange {
        /// Configured initial delay
        initial: Duration,
        /// Configured delay cap
        max: Duration,
    },
}
