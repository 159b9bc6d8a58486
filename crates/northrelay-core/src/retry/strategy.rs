//! The retry loop and the traits it is generic over.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Marker returned when a caller abandons an operation through its
/// [`CancellationToken`].
///
/// Error types used with [`execute_with_retry`] convert from this so that a
/// cancellation surfaces as its own variant, distinct from timeouts and
/// server failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Classification hooks an error type exposes to the retry loop.
///
/// Only [`is_retryable`](Retryable::is_retryable) is required. The other
/// methods let a [`BackoffStrategy`] refine its decision with transport
/// details when they exist.
pub trait Retryable {
    /// Whether the failure is transient, i.e. repeating the identical request
    /// could succeed.
    fn is_retryable(&self) -> bool;

    /// HTTP status code of the response that produced this failure, if any.
    fn status_code(&self) -> Option<u16> {
        None
    }

    /// Server-advertised delay before the request may be repeated.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Decides how long to wait between attempts and when to give up.
///
/// The trait is object-safe, so callers can hold a `Box<dyn BackoffStrategy>`
/// or `Arc<dyn BackoffStrategy>` when the policy is chosen at runtime.
pub trait BackoffStrategy: Send + Sync {
    /// Upper bound on the total number of attempts.
    ///
    /// Values of 0 and 1 both mean "run once, never retry".
    fn max_attempts(&self) -> u32;

    /// Delay to sleep after the failed attempt `attempt` (0-indexed).
    fn next_delay(&self, attempt: u32) -> Duration;

    /// Whether `error` should be retried at all.
    ///
    /// The default defers to [`Retryable::is_retryable`].
    fn should_retry(&self, error: &dyn Retryable) -> bool {
        error.is_retryable()
    }

    /// Delay to sleep after `error` ended attempt `attempt`.
    ///
    /// The default ignores the error and returns
    /// [`next_delay`](BackoffStrategy::next_delay).
    fn delay_for(&self, attempt: u32, error: &dyn Retryable) -> Duration {
        let _ = error;
        self.next_delay(attempt)
    }
}

/// Run `operation` under `strategy` until it succeeds, fails terminally,
/// exhausts its attempts, or `cancel` fires.
///
/// `operation` receives the 0-indexed attempt number. Retries are strictly
/// sequential. The loop holds no state besides the attempt counter; any side
/// effects belong to `operation`.
///
/// When `cancel` is triggered, whether the operation is in flight or the loop
/// is sleeping between attempts, the pending work is dropped, no further
/// attempts are made, and `E::from(Cancelled)` is returned.
///
/// # Examples
///
/// ```rust
/// use northrelay_core::prelude::*;
/// use std::time::Duration;
///
/// #[derive(Debug, PartialEq)]
/// enum Failure {
///     Terminal,
///     Cancelled,
/// }
///
/// impl Retryable for Failure {
///     fn is_retryable(&self) -> bool {
///         false
///     }
/// }
///
/// impl From<Cancelled> for Failure {
///     fn from(_: Cancelled) -> Self {
///         Failure::Cancelled
///     }
/// }
///
/// # async fn example() -> Result<(), PolicyError> {
/// let policy = RetryPolicy::builder().max_attempts(5).build()?;
/// let cancel = CancellationToken::new();
///
/// let result: Result<(), Failure> =
///     execute_with_retry(&policy, &cancel, |_| async { Err(Failure::Terminal) }).await;
/// assert_eq!(result, Err(Failure::Terminal));
/// # Ok(())
/// # }
/// ```
pub async fn execute_with_retry<S, F, Fut, T, E>(
    strategy: &S,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, E>
where
    S: BackoffStrategy + ?Sized,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + From<Cancelled>,
{
    let max_attempts = strategy.max_attempts().max(1);
    let mut attempt = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(E::from(Cancelled));
        }

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(E::from(Cancelled)),
            outcome = operation(attempt) => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if attempt + 1 >= max_attempts {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                attempts = attempt + 1,
                retryable = error.is_retryable(),
                "Giving up after final attempt"
            );
            return Err(error);
        }

        if !strategy.should_retry(&error) {
            return Err(error);
        }

        let delay = strategy.delay_for(attempt, &error);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            status = error.status_code(),
            delay_ms = delay.as_millis() as u64,
            "Retrying after transient failure"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(E::from(Cancelled)),
            () = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}
