//! Upstream API configuration
//!
//! Secrets are optional at load time; `credentials()` reports what is missing
//! with the symbolic code clients key off.

use super::env_var;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};

/// LastFM upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastfmConfig {
    /// API key, required to call the upstream
    pub api_key: Option<String>,
    /// Account whose listening data is proxied
    pub username: Option<String>,
    /// API endpoint, overridable for tests
    #[serde(default = "default_lastfm_api_base")]
    pub api_base: String,
}

impl Default for LastfmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            username: None,
            api_base: default_lastfm_api_base(),
        }
    }
}

impl LastfmConfig {
    /// Load LastFM configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env_var("LASTFM_API_KEY"),
            username: env_var("DEFAULT_LASTFM_USERNAME"),
            api_base: env_var("LASTFM_API_BASE").unwrap_or_else(default_lastfm_api_base),
        }
    }

    /// Resolve `(api_key, username)`, failing with a symbolic code when unset
    pub fn credentials(&self) -> Result<(String, String)> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| GatewayError::config("MISSING_API_KEY", "LastFM API key not configured"))?;
        let username = self.username.clone().ok_or_else(|| {
            GatewayError::config(
                "MISSING_USERNAME_CONFIG",
                "DEFAULT_LASTFM_USERNAME environment variable not configured",
            )
        })?;
        Ok((api_key, username))
    }
}

/// Discord upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token used for authorization
    pub bot_token: Option<String>,
    /// User whose profile is proxied
    pub user_id: Option<String>,
    /// API endpoint, overridable for tests
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            user_id: None,
            api_base: default_discord_api_base(),
        }
    }
}

impl DiscordConfig {
    /// Load Discord configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bot_token: env_var("DISCORD_BOT_TOKEN"),
            user_id: env_var("DISCORD_USER_ID"),
            api_base: env_var("DISCORD_API_BASE").unwrap_or_else(default_discord_api_base),
        }
    }

    /// Resolve `(bot_token, user_id)`, failing with a symbolic code when unset
    pub fn credentials(&self) -> Result<(String, String)> {
        let bot_token = self.bot_token.clone().ok_or_else(|| {
            GatewayError::config("MISSING_DISCORD_TOKEN", "Discord bot token not configured")
        })?;
        let user_id = self.user_id.clone().ok_or_else(|| {
            GatewayError::config("MISSING_DISCORD_USER_ID", "Discord user ID not configured")
        })?;
        Ok((bot_token, user_id))
    }
}

fn default_lastfm_api_base() -> String {
    "https://ws.audioscrobbler.com/2.0/".to_string()
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_reports_symbolic_code() {
        let config = LastfmConfig::default();
        let err = config.credentials().unwrap_err();
        assert_eq!(err.error_code(), Some("MISSING_API_KEY"));
    }

    #[test]
    fn missing_username_reports_symbolic_code() {
        let config = LastfmConfig {
            api_key: Some("key".to_string()),
            ..LastfmConfig::default()
        };
        let err = config.credentials().unwrap_err();
        assert_eq!(err.error_code(), Some("MISSING_USERNAME_CONFIG"));
    }

    #[test]
    fn discord_credentials_resolve_when_present() {
        let config = DiscordConfig {
            bot_token: Some("token".to_string()),
            user_id: Some("123".to_string()),
            ..DiscordConfig::default()
        };
        let (token, user_id) = config.credentials().unwrap();
        assert_eq!(token, "token");
        assert_eq!(user_id, "123");
    }

    #[test]
    fn missing_discord_token_reports_symbolic_code() {
        let config = DiscordConfig::default();
        let err = config.credentials().unwrap_err();
        assert_eq!(err.error_code(), Some("MISSING_DISCORD_TOKEN"));
    }
}
