//! Sliding-window rate limiting
//!
//! Per-client-key admission control over a trailing time window. State is
//! process-lifetime only; restarting silently resets every client's budget.

mod limiter;
mod types;


pub use limiter::SlidingWindowLimiter;
pub use types::RateLimitDecision;
