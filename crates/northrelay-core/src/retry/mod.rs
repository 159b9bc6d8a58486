//! Retry policy and the sequential retry loop.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - immutable backoff configuration
//! - [`BackoffStrategy`] - delay and give-up decisions consulted by the loop
//! - [`Retryable`] - error-side classification (transient or terminal)
//! - [`execute_with_retry`] - runs an operation until success, a terminal
//!   error, exhaustion, or cancellation
//!
//! # Examples
//!
//! ```rust
//! use northrelay_core::retry::{Cancelled, RetryPolicy, Retryable, execute_with_retry};
//! use northrelay_core::CancellationToken;
//!
//! #[derive(Debug)]
//! struct Transient;
//!
//! impl Retryable for Transient {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! impl From<Cancelled> for Transient {
//!     fn from(_: Cancelled) -> Self {
//!         Transient
//!     }
//! }
//!
//! # async fn example() {
//! let policy = RetryPolicy::default();
//! let cancel = CancellationToken::new();
//!
//! let result = execute_with_retry(&policy, &cancel, |attempt| async move {
//!     if attempt < 1 { Err(Transient) } else { Ok("done") }
//! })
//! .await;
//! # }
//! ```

mod policy;
mod strategy;

pub use policy::{RetryPolicy, RetryPolicyBuilder};
pub use strategy::{BackoffStrategy, Cancelled, Retryable, execute_with_retry};
