//! Rate-limit tracking from response headers
//!
//! The platform reports the caller's request budget on every response:
//!
//! | Header                  | Meaning                                   |
//! |-------------------------|-------------------------------------------|
//! | `x-ratelimit-limit`     | Requests allowed per window               |
//! | `x-ratelimit-remaining` | Requests left in the current window       |
//! | `x-ratelimit-reset`     | Unix time (seconds) when the window resets|
//!
//! [`RateLimitTracker`] keeps the most recent complete observation. It does
//! not throttle anything.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use http::HeaderMap;

/// Header carrying the window size.
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header carrying the requests left.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header carrying the reset time as Unix seconds.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit state as of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Requests allowed per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

impl RateLimitSnapshot {
    /// Parse a snapshot from response headers.
    ///
    /// Returns `None` unless all three headers are present and parse as
    /// integers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_value(headers, LIMIT_HEADER)?.parse().ok()?;
        let remaining = header_value(headers, REMAINING_HEADER)?.parse().ok()?;
        let reset: i64 = header_value(headers, RESET_HEADER)?.parse().ok()?;

        Some(Self {
            limit,
            remaining,
            reset_at: DateTime::from_timestamp(reset, 0)?,
        })
    }

    /// Whether the window is used up.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Holds the last complete [`RateLimitSnapshot`] observed by a client.
///
/// Updates replace the snapshot wholesale, so concurrent readers see either
/// the old or the new one, never a mix.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    snapshot: RwLock<Option<RateLimitSnapshot>>,
}

impl RateLimitTracker {
    /// Create a tracker with no observation yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the headers of a response.
    ///
    /// Incomplete or unparseable headers leave the previous snapshot intact.
    pub fn observe(&self, headers: &HeaderMap) {
        let Some(snapshot) = RateLimitSnapshot::from_headers(headers) else {
            return;
        };

        let mut slot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(snapshot);
        drop(slot);

        tracing::trace!(
            limit = snapshot.limit,
            remaining = snapshot.remaining,
            reset_at = %snapshot.reset_at,
            "Rate limit updated"
        );
    }

    /// The most recent snapshot, or `None` if no response carried the headers.
    pub fn current(&self) -> Option<RateLimitSnapshot> {
        *self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn headers(limit: &str, remaining: &str, reset: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(LIMIT_HEADER, limit.parse().unwrap());
        map.insert(REMAINING_HEADER, remaining.parse().unwrap());
        map.insert(RESET_HEADER, reset.parse().unwrap());
        map
    }

    #[test]
    fn test_observe_records_exact_triple() {
        let tracker = RateLimitTracker::new();
        assert_eq!(tracker.current(), None);

        tracker.observe(&headers("100", "42", "1700000000"));

        let snapshot = tracker.current().unwrap();
        assert_eq!(snapshot.limit, 100);
        assert_eq!(snapshot.remaining, 42);
        assert_eq!(snapshot.reset_at.timestamp(), 1_700_000_000);
        assert!(!snapshot.is_exhausted());
    }

    #[test]
    fn test_missing_headers_keep_previous_snapshot() {
        let tracker = RateLimitTracker::new();
        tracker.observe(&headers("100", "42", "1700000000"));
        let before = tracker.current();

        tracker.observe(&HeaderMap::new());
        assert_eq!(tracker.current(), before);

        let mut partial = HeaderMap::new();
        partial.insert(LIMIT_HEADER, "500".parse().unwrap());
        partial.insert(REMAINING_HEADER, "499".parse().unwrap());
        tracker.observe(&partial);
        assert_eq!(tracker.current(), before);
    }

    #[test]
    fn test_unparseable_headers_are_ignored() {
        let tracker = RateLimitTracker::new();
        tracker.observe(&headers("100", "many", "1700000000"));
        assert_eq!(tracker.current(), None);

        tracker.observe(&headers("100", "10", "2024-01-01T00:00:00Z"));
        assert_eq!(tracker.current(), None);

        tracker.observe(&headers("-1", "10", "1700000000"));
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_later_observation_replaces_earlier() {
        let tracker = RateLimitTracker::new();
        tracker.observe(&headers("100", "42", "1700000000"));
        tracker.observe(&headers("100", "0", "1700000060"));

        let snapshot = tracker.current().unwrap();
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.reset_at.timestamp(), 1_700_000_060);
        assert!(snapshot.is_exhausted());
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let snapshot = RateLimitSnapshot::from_headers(&headers(" 100", "5 ", "1700000000"));
        assert_eq!(snapshot.map(|s| s.remaining), Some(5));
    }

    #[test]
    fn test_concurrent_observations_never_mix() {
        let tracker = Arc::new(RateLimitTracker::new());

        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let n = i.to_string();
                        tracker.observe(&headers(&n, &n, &n));
                        if let Some(s) = tracker.current() {
                            assert_eq!(s.limit, s.remaining);
                            assert_eq!(s.limit as i64, s.reset_at.timestamp());
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(tracker.current().is_some());
    }
}
