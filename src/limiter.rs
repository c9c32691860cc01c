// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact submissions.
//!
//! Each caller identity gets a counter and a reset time. Expired records are
//! evicted on every check, so the table only ever holds identities seen within
//! the last window.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets
        reset_in: Duration,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }

    /// Remaining quota after this check; zero when limited.
    pub fn remaining(&self) -> u32 {
        match self {
            RateDecision::Allowed { remaining, .. } => *remaining,
            RateDecision::Limited { .. } => 0,
        }
    }
}

/// Per-identity counter.
#[derive(Debug)]
struct RateLimitRecord {
    count: u32,
    reset_at: Instant,
}

/// Thread-safe rate limiter.
///
/// Eviction, lookup and increment run under one lock, so concurrent requests
/// from the same identity cannot both slip under the quota.
pub struct RateLimiter {
    config: RateLimitConfig,
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Check and count a request from `identity` at the current time.
    pub async fn check(&self, identity: &str) -> RateDecision {
        self.check_at(identity, Instant::now()).await
    }

    /// Check and count a request from `identity` at `now`.
    pub async fn check_at(&self, identity: &str, now: Instant) -> RateDecision {
        let max = self.config.max_requests;
        let window = self.config.window_duration();

        let mut records = self.records.lock().await;

        let before = records.len();
        records.retain(|_, record| now <= record.reset_at);
        let evicted = before - records.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired rate limit records");
        }

        match records.get_mut(identity) {
            Some(record) if record.count >= max => {
                let reset_in = record.reset_at.saturating_duration_since(now);
                debug!(identity, ?reset_in, "Identity rate limit exceeded");
                RateDecision::Limited { reset_in }
            }
            Some(record) => {
                record.count += 1;
                RateDecision::Allowed {
                    remaining: max - record.count,
                    reset_in: record.reset_at.saturating_duration_since(now),
                }
            }
            None => {
                // First request, or the previous window expired and was evicted
                records.insert(
                    identity.to_string(),
                    RateLimitRecord {
                        count: 1,
                        reset_at: now.checked_add(window).unwrap_or(now),
                    },
                );
                RateDecision::Allowed {
                    remaining: max - 1,
                    reset_in: window,
                }
            }
        }
    }

    /// Number of identities currently tracked.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    #[cfg(test)]
    async fn count_for(&self, identity: &str) -> Option<u32> {
        self.records.lock().await.get(identity).map(|r| r.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default())
    }

    #[tokio::test]
    async fn test_quota_per_window() {
        let limiter = limiter();
        let now = Instant::now();

        // First 5 requests should succeed
        for i in 0..5u32 {
            match limiter.check_at("203.0.113.7", now).await {
                RateDecision::Allowed { remaining, .. } => assert_eq!(remaining, 4 - i),
                RateDecision::Limited { .. } => panic!("Should not be limited"),
            }
        }

        // 6th request should be limited
        let decision = limiter.check_at("203.0.113.7", now + Duration::from_secs(30)).await;
        assert_eq!(
            decision,
            RateDecision::Limited {
                reset_in: Duration::from_secs(30)
            }
        );
        assert_eq!(decision.remaining(), 0);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at("203.0.113.7", now).await.is_allowed());
        }
        assert!(!limiter.check_at("203.0.113.7", now).await.is_allowed());

        let later = now + Duration::from_secs(61);
        let decision = limiter.check_at("203.0.113.7", later).await;
        assert_eq!(
            decision,
            RateDecision::Allowed {
                remaining: 4,
                reset_in: Duration::from_secs(60)
            }
        );
        assert_eq!(limiter.count_for("203.0.113.7").await, Some(1));
    }

    #[tokio::test]
    async fn test_window_boundary_is_inclusive() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..5 {
            limiter.check_at("a", now).await;
        }
        // Exactly at the reset time the window has not yet passed
        assert!(!limiter
            .check_at("a", now + Duration::from_secs(60))
            .await
            .is_allowed());
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..5 {
            limiter.check_at("a", now).await;
        }
        assert!(!limiter.check_at("a", now).await.is_allowed());
        assert_eq!(
            limiter.check_at("b", now).await,
            RateDecision::Allowed {
                remaining: 4,
                reset_in: Duration::from_secs(60)
            }
        );
    }

    #[tokio::test]
    async fn test_expired_records_evicted_on_any_check() {
        let limiter = limiter();
        let now = Instant::now();

        limiter.check_at("a", now).await;
        limiter.check_at("b", now).await;
        assert_eq!(limiter.len().await, 2);

        limiter.check_at("c", now + Duration::from_secs(90)).await;
        assert_eq!(limiter.len().await, 1);
        assert_eq!(limiter.count_for("a").await, None);
        assert_eq!(limiter.count_for("c").await, Some(1));
    }

    #[tokio::test]
    async fn test_oversized_window_does_not_panic() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 5,
            window_secs: u64::MAX,
        });
        let decision = limiter.check("a").await;
        assert_eq!(
            decision,
            RateDecision::Allowed {
                remaining: 4,
                reset_in: Duration::from_secs(crate::config::MAX_WINDOW_SECS)
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_exceed_quota() {
        let limiter = Arc::new(limiter());
        let now = Instant::now();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.check_at("shared", now).await })
            })
            .collect();

        let mut allowed = 0;
        for task in tasks {
            if task.await.unwrap().is_allowed() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }
}
