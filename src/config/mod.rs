//! Configuration management for the gateway
//!
//! Everything is environment-sourced (optionally via a `.env` file loaded in
//! `main`). Structural values are validated at startup; upstream secrets are
//! deliberately checked lazily per request so a partially configured
//! deployment still serves the routes it can.

pub mod models;

pub use models::{DiscordConfig, LastfmConfig, RateLimitConfig, RateLimits, ServerConfig};

use crate::utils::error::{GatewayError, Result};
use tracing::debug;

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Rate limiter configuration (general + LastFM-scoped)
    pub rate_limit: RateLimits,
    /// LastFM upstream configuration
    pub lastfm: LastfmConfig,
    /// Discord upstream configuration
    pub discord: DiscordConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            rate_limit: RateLimits::from_env(),
            lastfm: LastfmConfig::from_env(),
            discord: DiscordConfig::from_env(),
        };

        config
            .validate()
            .map_err(|e| GatewayError::config("CONFIG_ERROR", e))?;

        debug!("Configuration loaded from environment");
        Ok(config)
    }

    /// Validate structural configuration
    ///
    /// Upstream secrets are not checked here; their absence is reported per
    /// request with a symbolic code.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.server.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.server.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_rate_limit_budget_is_rejected() {
        let mut config = Config::default();
        config.rate_limit.lastfm.max_requests = 0;
        assert!(config.validate().is_err());
    }
}
