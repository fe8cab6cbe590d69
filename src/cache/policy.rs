//! Freshness rules for the cached feed

use chrono::{DateTime, Duration, Utc};

/// Number of days a cached feed stays fresh
pub const MAX_CACHE_AGE_DAYS: i64 = 7;

/// Returns whether a snapshot saved at `timestamp` is still fresh at `now`
///
/// The snapshot is fresh while `now` is strictly before `timestamp + max_age`;
/// a snapshot exactly `max_age` old is already expired. An expiry instant that
/// cannot be represented counts as expired.
pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    match timestamp.checked_add_signed(max_age) {
        Some(expires_at) => now < expires_at,
        None => false,
    }
}

/// Max-age rule applied by the local loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    max_age: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::days(MAX_CACHE_AGE_DAYS),
        }
    }
}

impl CachePolicy {
    /// Creates a policy with a custom max age
    pub fn with_max_age(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// The configured max age
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Checks `timestamp` against `now` using this policy's max age
    pub fn validate(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_valid(timestamp, now, self.max_age)
    }
}
