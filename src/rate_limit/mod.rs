//! Soft rate limiting keyed by an arbitrary identifier (an email, a user id).
//!
//! The limiter is injected through [`crate::state::AppState`] as a trait object so
//! a multi-instance deployment can swap the in-memory buckets for a shared store.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitPolicy;

/// Number of buckets above which expired entries are swept on insert.
const SWEEP_THRESHOLD: usize = 10_000;

/// Fixed-window counter store.
pub trait RateLimiter: Send + Sync + Debug {
    /// Count one hit for `identifier` and report whether it is still within `limit`
    /// hits for the current `window`.
    fn check(&self, identifier: &str, limit: u32, window: Duration) -> bool;

    /// Convenience wrapper taking a configured policy.
    fn check_policy(&self, identifier: &str, policy: RateLimitPolicy) -> bool {
        self.check(identifier, policy.limit, policy.window)
    }
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    expires_at: Instant,
}

/// Process-local limiter backed by a concurrent map of expiring counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimiter {
    buckets: Arc<DashMap<String, Bucket>>,
}

impl InMemoryRateLimiter {
    /// Create a limiter with no buckets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
        }
    }

    /// Drop every bucket whose window has elapsed.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| bucket.expires_at > now);
    }

    /// Number of identifiers currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn check_at(&self, identifier: &str, limit: u32, window: Duration, now: Instant) -> bool {
        if let Some(mut bucket) = self.buckets.get_mut(identifier)
            && bucket.expires_at > now
        {
            if bucket.count >= limit {
                return false;
            }
            bucket.count += 1;
            return true;
        }

        if self.buckets.len() >= SWEEP_THRESHOLD {
            self.purge_expired();
        }

        self.buckets.insert(
            identifier.to_string(),
            Bucket {
                count: 1,
                expires_at: now + window,
            },
        );
        true
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn check(&self, identifier: &str, limit: u32, window: Duration) -> bool {
        self.check_at(identifier, limit, window, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(60);

        assert!(limiter.check("a@example.com", 3, window));
        assert!(limiter.check("a@example.com", 3, window));
        assert!(limiter.check("a@example.com", 3, window));
        assert!(!limiter.check("a@example.com", 3, window));
        assert!(!limiter.check("a@example.com", 3, window));
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(60);

        assert!(limiter.check("a", 1, window));
        assert!(!limiter.check("a", 1, window));
        assert!(limiter.check("b", 1, window));
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn expired_window_starts_a_new_bucket() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(10);
        let start = Instant::now();

        assert!(limiter.check_at("a", 1, window, start));
        assert!(!limiter.check_at("a", 1, window, start + Duration::from_secs(5)));
        assert!(limiter.check_at("a", 1, window, start + Duration::from_secs(11)));
    }

    #[test]
    fn purge_removes_only_expired_buckets() {
        let limiter = InMemoryRateLimiter::new();
        limiter.check("stale", 5, Duration::ZERO);
        limiter.check("fresh", 5, Duration::from_secs(60));

        limiter.purge_expired();

        assert_eq!(limiter.len(), 1);
        assert!(!limiter.is_empty());
    }

    #[test]
    fn policy_wrapper_uses_configured_limit() {
        let limiter = InMemoryRateLimiter::new();
        let policy = RateLimitPolicy {
            limit: 1,
            window: Duration::from_secs(60),
        };

        assert!(limiter.check_policy("user", policy));
        assert!(!limiter.check_policy("user", policy));
    }
}
