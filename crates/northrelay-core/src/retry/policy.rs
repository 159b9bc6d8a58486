//! Exponential backoff policy with bounded jitter.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::strategy::{BackoffStrategy, Cancelled, Retryable, execute_with_retry};
use crate::error::PolicyError;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
const DEFAULT_MULTIPLIER: f64 = 2.0;
const DEFAULT_JITTER: f64 = 0.1;
const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];
const STEPPED_ATTEMPTS: u32 = 64;

/// Immutable retry configuration.
///
/// Delays grow exponentially from `initial_delay` by `multiplier` per attempt
/// and never exceed `max_delay`. Jitter adds a random amount on top of the
/// base delay so that many clients failing at once do not retry in lockstep.
///
/// # Formula
///
/// For the failed attempt `n` (0-indexed):
/// ```text
/// base(n)   = min(initial_delay * multiplier^n, max_delay)
/// delay(n)  = min(base(n) + random[0, jitter * base(n)), max_delay)
/// ```
///
/// `base(n)` is non-decreasing in `n`.
///
/// # Examples
///
/// ```rust
/// use northrelay_core::RetryPolicy;
/// use std::time::Duration;
///
/// // 3 attempts, 1s initial, 10s cap, x2.0, 10% jitter
/// let policy = RetryPolicy::default();
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(1.5)
///     .jitter(0.2)
///     .build()
///     .expect("valid policy");
///
/// assert!(policy.next_delay(10) <= Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
    retryable_status_codes: BTreeSet<u16>,
    honor_retry_after: bool,
}

impl RetryPolicy {
    /// Create a new builder for configuring a policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that runs the operation exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Upper bound on the total number of attempts (1 = no retry).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Cap applied to every delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Growth factor per attempt.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Jitter as a fraction of the base delay, in `[0, 1]`.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// HTTP status codes that may be retried.
    pub fn retryable_status_codes(&self) -> &BTreeSet<u16> {
        &self.retryable_status_codes
    }

    /// Whether failures with this status code are eligible for retry.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Whether server-advertised `Retry-After` delays stretch the backoff.
    pub fn honors_retry_after(&self) -> bool {
        self.honor_retry_after
    }

    /// Deterministic part of the delay after failed attempt `attempt`.
    ///
    /// Non-decreasing in `attempt` and never above [`max_delay`](Self::max_delay).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let max = self.max_delay.as_secs_f64();
        let initial = self.initial_delay.as_secs_f64();
        let mut secs = initial;

        // Grow step by step: each product is >= its input when multiplier >= 1,
        // which keeps the sequence monotone under floating-point rounding.
        for _ in 0..attempt.min(STEPPED_ATTEMPTS) {
            let next = secs * self.multiplier;
            if secs >= max || next <= secs {
                break;
            }
            secs = next;
        }

        // Past the stepped range a multiplier close to 1.0 is still short of
        // the cap; finish in closed form instead of stepping `attempt` times.
        if attempt > STEPPED_ATTEMPTS && secs < max {
            secs = secs.max(initial * self.multiplier.powf(f64::from(attempt)));
        }

        if secs >= max {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Delay to sleep after failed attempt `attempt`, jitter included.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.jitter <= 0.0 || base >= self.max_delay {
            return base;
        }

        let base_secs = base.as_secs_f64();
        let jitter = base_secs * self.jitter * rand::random::<f64>();
        Duration::from_secs_f64((base_secs + jitter).min(self.max_delay.as_secs_f64()))
    }

    /// Run `operation` under this policy without external cancellation.
    ///
    /// Shorthand for [`execute_with_retry`] with a token nobody cancels.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + From<Cancelled>,
    {
        execute_with_retry(self, &CancellationToken::new(), operation).await
    }
}

impl Default for RetryPolicy {
    /// Defaults:
    /// - `max_attempts`: 3
    /// - `initial_delay`: 1s
    /// - `max_delay`: 10s
    /// - `multiplier`: 2.0
    /// - `jitter`: 0.1
    /// - `retryable_status_codes`: 429, 500, 502, 503, 504
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            jitter: DEFAULT_JITTER,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            honor_retry_after: false,
        }
    }
}

impl BackoffStrategy for RetryPolicy {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        RetryPolicy::next_delay(self, attempt)
    }

    fn should_retry(&self, error: &dyn Retryable) -> bool {
        error.is_retryable()
            && error
                .status_code()
                .is_none_or(|status| self.is_retryable_status(status))
    }

    fn delay_for(&self, attempt: u32, error: &dyn Retryable) -> Duration {
        let backoff = RetryPolicy::next_delay(self, attempt);
        match error.retry_after() {
            Some(advertised) if self.honor_retry_after => {
                backoff.max(advertised.min(self.max_delay))
            }
            _ => backoff,
        }
    }
}

/// Builder for [`RetryPolicy`].
///
/// Unset fields fall back to the [`Default`] values of [`RetryPolicy`].
#[derive(Debug, Default, Clone)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
    retryable_status_codes: Option<BTreeSet<u16>>,
    honor_retry_after: Option<bool>,
}

impl RetryPolicyBuilder {
    /// Set the upper bound on total attempts.
    ///
    /// Default: 3
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the cap on every delay.
    ///
    /// Default: 10s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the growth factor per attempt. Must be at least 1.0.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter fraction (clamped to 0.0..=1.0).
    ///
    /// Default: 0.1
    pub fn jitter(mut self, jitter: f64) -> Self {
        let jitter = if jitter.is_nan() { 0.0 } else { jitter };
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Replace the set of retryable status codes.
    ///
    /// Default: 429, 500, 502, 503, 504
    pub fn retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = Some(codes.into_iter().collect());
        self
    }

    /// Let a server-advertised `Retry-After` lengthen the sleep, still capped
    /// at the max delay.
    ///
    /// Default: false
    pub fn honor_retry_after(mut self, honor: bool) -> Self {
        self.honor_retry_after = Some(honor);
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidMultiplier`] if the multiplier is below 1.0 or not finite
    /// - [`PolicyError::DelayOutOfRange`] if the initial delay exceeds the max delay
    pub fn build(self) -> Result<RetryPolicy, PolicyError> {
        let defaults = RetryPolicy::default();

        let multiplier = self.multiplier.unwrap_or(defaults.multiplier);
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(PolicyError::InvalidMultiplier(multiplier));
        }

        let initial_delay = self.initial_delay.unwrap_or(defaults.initial_delay);
        let max_delay = self.max_delay.unwrap_or(defaults.max_delay);
        if initial_delay > max_delay {
            return Err(PolicyError::DelayOutOfRange {
                initial: initial_delay,
                max: max_delay,
            });
        }

        Ok(RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_delay,
            max_delay,
            multiplier,
            jitter: self.jitter.unwrap_or(defaults.jitter),
            retryable_status_codes: self
                .retryable_status_codes
                .unwrap_or(defaults.retryable_status_codes),
            honor_retry_after: self.honor_retry_after.unwrap_or(defaults.honor_retry_after),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Advertised(Option<Duration>);

    impl Retryable for Advertised {
        fn is_retryable(&self) -> bool {
            true
        }

        fn retry_after(&self) -> Option<Duration> {
            self.0
        }
    }

    fn no_jitter() -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(5)
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .multiplier(2.0)
            .jitter(0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_exponential_delay_calculation() {
        let policy = no_jitter();

        assert_eq!(policy.next_delay(0), Duration::from_millis(100));
        assert_eq!(policy.next_delay(1), Duration::from_millis(200));
        assert_eq!(policy.next_delay(2), Duration::from_millis(400));
        assert_eq!(policy.next_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .multiplier(10.0)
            .jitter(0.0)
            .build()
            .unwrap();

        for attempt in 1..40 {
            assert_eq!(policy.next_delay(attempt), Duration::from_secs(5));
        }
        assert_eq!(policy.next_delay(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_is_bounded_addition() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(60))
            .jitter(0.5)
            .build()
            .unwrap();

        let delays: Vec<_> = (0..50).map(|_| policy.next_delay(0)).collect();
        for delay in &delays {
            assert!(
                (1000..1500).contains(&delay.as_millis()),
                "delay with 50% jitter should be in [1000ms, 1500ms), got {delay:?}"
            );
        }

        let all_same = delays.windows(2).all(|w| w[0] == w[1]);
        assert!(!all_same, "jittered delays should vary");
    }

    #[test]
    fn test_jitter_never_pushes_past_cap() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(900))
            .max_delay(Duration::from_secs(1))
            .jitter(1.0)
            .build()
            .unwrap();

        for _ in 0..100 {
            assert!(policy.next_delay(0) <= Duration::from_secs(1));
        }
    }

    #[test]
    fn test_unit_multiplier_keeps_delay_constant() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(250))
            .multiplier(1.0)
            .jitter(0.0)
            .build()
            .unwrap();

        assert_eq!(policy.next_delay(0), Duration::from_millis(250));
        assert_eq!(policy.next_delay(1_000), Duration::from_millis(250));
    }

    #[test]
    fn test_near_unit_multiplier_with_huge_attempt() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(250))
            .max_delay(Duration::from_secs(30))
            .multiplier(1.0 + f64::EPSILON)
            .jitter(0.0)
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let last = policy.base_delay(u32::MAX);
        assert!(started.elapsed() < Duration::from_secs(1));

        assert!(last >= policy.base_delay(64));
        assert!(last >= Duration::from_millis(250));
        assert!(last < Duration::from_millis(251));
    }

    #[test]
    fn test_closed_form_continues_stepped_growth() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(1))
            .max_delay(Duration::from_secs(3600))
            .multiplier(1.1)
            .jitter(0.0)
            .build()
            .unwrap();

        for attempt in 60..80 {
            assert!(policy.base_delay(attempt) <= policy.base_delay(attempt + 1));
        }
        assert_eq!(policy.base_delay(200), Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_initial_delay() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::ZERO)
            .build()
            .unwrap();

        assert_eq!(policy.next_delay(0), Duration::ZERO);
        assert_eq!(policy.next_delay(7), Duration::ZERO);
    }

    #[test]
    fn test_builder_defaults() {
        let policy = RetryPolicy::builder().build().unwrap();

        assert_eq!(policy, RetryPolicy::default());
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_secs(1));
        assert_eq!(policy.max_delay(), Duration::from_secs(10));
        assert_eq!(policy.multiplier(), 2.0);
        assert_eq!(policy.jitter(), 0.1);
        assert!(!policy.honors_retry_after());
        assert_eq!(
            policy.retryable_status_codes().iter().copied().collect::<Vec<_>>(),
            vec![429, 500, 502, 503, 504]
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let policy = RetryPolicy::builder()
            .max_attempts(7)
            .initial_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(30))
            .multiplier(1.5)
            .jitter(0.2)
            .retryable_status_codes([503])
            .honor_retry_after(true)
            .build()
            .unwrap();

        assert_eq!(policy.max_attempts(), 7);
        assert_eq!(policy.initial_delay(), Duration::from_millis(200));
        assert_eq!(policy.max_delay(), Duration::from_secs(30));
        assert_eq!(policy.multiplier(), 1.5);
        assert_eq!(policy.jitter(), 0.2);
        assert!(policy.is_retryable_status(503));
        assert!(!policy.is_retryable_status(500));
        assert!(policy.honors_retry_after());
    }

    #[test]
    fn test_jitter_clamped() {
        assert_eq!(RetryPolicy::builder().jitter(2.0).build().unwrap().jitter(), 1.0);
        assert_eq!(RetryPolicy::builder().jitter(-0.5).build().unwrap().jitter(), 0.0);
        assert_eq!(RetryPolicy::builder().jitter(f64::NAN).build().unwrap().jitter(), 0.0);
    }

    #[test]
    fn test_rejects_multiplier_below_one() {
        let err = RetryPolicy::builder().multiplier(0.5).build().unwrap_err();
        assert_eq!(err, PolicyError::InvalidMultiplier(0.5));

        assert!(RetryPolicy::builder().multiplier(f64::INFINITY).build().is_err());
    }

    #[test]
    fn test_rejects_initial_above_max() {
        let err = RetryPolicy::builder()
            .initial_delay(Duration::from_secs(20))
            .max_delay(Duration::from_secs(10))
            .build()
            .unwrap_err();

        assert!(matches!(err, PolicyError::DelayOutOfRange { .. }));
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_retry_after_ignored_by_default() {
        let policy = no_jitter();
        let delay = policy.delay_for(0, &Advertised(Some(Duration::from_secs(3))));
        assert_eq!(delay, Duration::from_millis(100));
    }

    #[test]
    fn test_retry_after_honored_and_capped() {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(2))
            .jitter(0.0)
            .honor_retry_after(true)
            .build()
            .unwrap();

        let advertised = policy.delay_for(0, &Advertised(Some(Duration::from_secs(1))));
        assert_eq!(advertised, Duration::from_secs(1));

        let capped = policy.delay_for(0, &Advertised(Some(Duration::from_secs(60))));
        assert_eq!(capped, Duration::from_secs(2));

        let absent = policy.delay_for(0, &Advertised(None));
        assert_eq!(absent, Duration::from_millis(100));
    }
}
