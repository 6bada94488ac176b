//! Rate limiter types

use chrono::{DateTime, Utc};

/// Outcome of one admission check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the window after this one
    pub remaining: u32,
    /// Absolute time at which a fresh window would end
    pub reset_at: DateTime<Utc>,
    /// Seconds until a slot frees up (only set when rejected)
    pub retry_after_secs: Option<u64>,
}
