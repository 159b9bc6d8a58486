#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry primitives for the NorthRelay SDK.
//!
//! This crate knows nothing about HTTP. It provides:
//!
//! - **[`RetryPolicy`]**: an immutable retry configuration with exponential
//!   backoff, bounded jitter, and a set of retryable HTTP status codes
//! - **[`BackoffStrategy`]**: the seam between the retry loop and the delay math
//! - **[`Retryable`]**: implemented by error types so the loop can ask whether
//!   a failure is transient
//! - **[`execute_with_retry`]**: the sequential retry loop, with cooperative
//!   cancellation during both the operation and the backoff sleep
//!
//! # Examples
//!
//! ```rust
//! use northrelay_core::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Flaky,
//!     Cancelled,
//! }
//!
//! impl Retryable for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, FetchError::Flaky)
//!     }
//! }
//!
//! impl From<Cancelled> for FetchError {
//!     fn from(_: Cancelled) -> Self {
//!         FetchError::Cancelled
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build()?;
//!
//! let value = policy
//!     .execute(|_attempt| async { Ok::<_, FetchError>(42) })
//!     .await;
//! assert_eq!(value.ok(), Some(42));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod retry;

pub use error::PolicyError;
pub use retry::{
    BackoffStrategy, Cancelled, RetryPolicy, RetryPolicyBuilder, Retryable, execute_with_retry,
};
pub use tokio_util::sync::CancellationToken;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use northrelay_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::PolicyError;
    pub use crate::retry::{
        BackoffStrategy, Cancelled, RetryPolicy, RetryPolicyBuilder, Retryable,
        execute_with_retry,
    };
    pub use tokio_util::sync::CancellationToken;
}
