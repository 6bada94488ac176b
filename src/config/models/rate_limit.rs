//! Rate limiting configuration

use super::env_parse;
use serde::{Deserialize, Serialize};

/// Configuration for one sliding-window limiter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum requests admitted per key within the window
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Validate limiter configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window_secs == 0 {
            return Err("Rate limit window cannot be 0".to_string());
        }

        if self.max_requests == 0 {
            return Err("Rate limit budget cannot be 0".to_string());
        }

        Ok(())
    }
}

/// The two limiters applied to inbound traffic
///
/// The LastFM-scoped limiter is consulted before the general one, so LastFM
/// traffic is gated by whichever trips first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimits {
    /// Limiter applied to every route
    pub general: RateLimitConfig,
    /// Tighter limiter applied to the /lastfm route prefix
    pub lastfm: RateLimitConfig,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            general: RateLimitConfig {
                window_secs: default_window_secs(),
                max_requests: default_general_max(),
            },
            lastfm: RateLimitConfig {
                window_secs: default_window_secs(),
                max_requests: default_lastfm_max(),
            },
        }
    }
}

impl RateLimits {
    /// Load limiter configuration from environment variables
    pub fn from_env() -> Self {
        let window_secs = env_parse("RATE_LIMIT_WINDOW_SECS", default_window_secs());
        Self {
            general: RateLimitConfig {
                window_secs,
                max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", default_general_max()),
            },
            lastfm: RateLimitConfig {
                window_secs,
                max_requests: env_parse("LASTFM_RATE_LIMIT_MAX_REQUESTS", default_lastfm_max()),
            },
        }
    }

    /// Validate both limiter configurations
    pub fn validate(&self) -> Result<(), String> {
        self.general.validate()?;
        self.lastfm.validate()?;
        Ok(())
    }
}

fn default_window_secs() -> u64 {
    900
}

fn default_general_max() -> u32 {
    100
}

fn default_lastfm_max() -> u32 {
    50
}
