//! Core sliding-window limiter implementation

use super::types::RateLimitDecision;
use crate::config::RateLimitConfig;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Per-key request admission over a trailing time window
///
/// The current time is an explicit parameter so admission is deterministic
/// under test. Clones share the underlying entry map, so one limiter can be
/// handed to every server worker.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    /// Limiter configuration
    config: RateLimitConfig,
    /// Request timestamp log by client key
    entries: Arc<Mutex<HashMap<String, Vec<DateTime<Utc>>>>>,
    /// Window duration
    window: Duration,
}

impl SlidingWindowLimiter {
    /// Create a new limiter
    pub fn new(config: RateLimitConfig) -> Self {
        let window = Duration::seconds(config.window_secs as i64);
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
            window,
        }
    }

    /// Check and record one request for `key` at time `now`
    ///
    /// Expired entries are pruned first; an admitted request is appended to
    /// the log in the same critical section, so concurrent admissions for one
    /// key cannot under- or overcount.
    pub fn admit(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let window_start = now - self.window;
        let limit = self.config.max_requests;

        let mut entries = self.entries.lock();
        let log = entries.entry(key.to_string()).or_default();

        log.retain(|&t| t > window_start);

        let current = log.len() as u32;
        if current >= limit {
            // Oldest surviving entry decides when the next slot frees up
            let retry_after_secs = log
                .first()
                .map(|&oldest| {
                    let until_free = oldest + self.window - now;
                    (until_free.num_milliseconds().max(1) as u64).div_ceil(1000)
                })
                .unwrap_or(1);

            debug!(
                "Rate limit exceeded for {}: {}/{} requests",
                key, current, limit
            );

            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_at: now + self.window,
                retry_after_secs: Some(retry_after_secs),
            };
        }

        log.push(now);

        RateLimitDecision {
            allowed: true,
            limit,
            remaining: limit - (current + 1),
            reset_at: now + self.window,
            retry_after_secs: None,
        }
    }

    /// Drop keys whose logs hold no entries newer than `now - window`
    pub fn cleanup(&self, now: DateTime<Utc>) {
        let window_start = now - self.window;

        let mut entries = self.entries.lock();
        entries.retain(|_, log| {
            log.retain(|&t| t > window_start);
            !log.is_empty()
        });
    }

    /// Start a background task sweeping expired keys every minute
    pub fn start_cleanup_task(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                limiter.cleanup(Utc::now());
            }
        });
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.entries.lock().len()
    }
}
