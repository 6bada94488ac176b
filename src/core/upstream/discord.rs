//! Discord upstream client
//!
//! Fetches one user's profile with bot authorization and projects it to the
//! fields the site renders, synthesizing the CDN avatar URL.

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Discord CDN serving avatar images
const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Avatar hashes with this prefix are animated
const ANIMATED_AVATAR_PREFIX: &str = "a_";

/// Client for the Discord API
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
}

impl DiscordClient {
    /// Create a client against the given API endpoint
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    /// Fetch the profile of `user_id` using bot authorization
    pub async fn profile(&self, bot_token: &str, user_id: &str) -> Result<DiscordProfile> {
        let url = format!("{}/users/{}", self.api_base, user_id);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bot {}", bot_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Discord API error: {}", status);
            return Err(GatewayError::Upstream(format!(
                "Discord API responded with status: {}",
                status
            )));
        }

        let user: RawDiscordUser = response.json().await?;
        Ok(user.into_profile())
    }
}

/// Profile projection served to the site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    pub global_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDiscordUser {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    global_name: Option<String>,
}

impl RawDiscordUser {
    fn into_profile(self) -> DiscordProfile {
        let avatar_url = self
            .avatar
            .as_deref()
            .map(|hash| avatar_url(&self.id, hash));

        DiscordProfile {
            id: self.id,
            username: self.username,
            discriminator: self.discriminator,
            avatar: self.avatar,
            avatar_url,
            global_name: self.global_name,
        }
    }
}

/// Build the CDN URL for an avatar hash, honoring the animated marker
fn avatar_url(user_id: &str, hash: &str) -> String {
    let ext = if hash.starts_with(ANIMATED_AVATAR_PREFIX) {
        "gif"
    } else {
        "png"
    };
    format!("{}/avatars/{}/{}.{}?size=256", CDN_BASE, user_id, hash, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> DiscordProfile {
        serde_json::from_value::<RawDiscordUser>(value)
            .unwrap()
            .into_profile()
    }

    #[test]
    fn animated_avatar_gets_gif_extension() {
        let profile = profile(json!({
            "id": "123",
            "username": "tame",
            "avatar": "a_abc123",
        }));
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/123/a_abc123.gif?size=256")
        );
    }

    #[test]
    fn static_avatar_gets_png_extension() {
        let profile = profile(json!({
            "id": "123",
            "username": "tame",
            "avatar": "abc123",
        }));
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/123/abc123.png?size=256")
        );
    }

    #[test]
    fn missing_avatar_yields_null_url() {
        let profile = profile(json!({
            "id": "123",
            "username": "tame",
            "global_name": "Tame",
        }));
        assert_eq!(profile.avatar, None);
        assert_eq!(profile.avatar_url, None);

        let serialized = serde_json::to_value(&profile).unwrap();
        assert_eq!(serialized["avatarUrl"], json!(null));
        assert_eq!(serialized["global_name"], json!("Tame"));
    }
}
