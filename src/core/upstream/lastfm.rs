//! LastFM upstream client
//!
//! LastFM's JSON is loosely typed: artist and album arrive either as a bare
//! string or as an object with a `#text` field, the track list is absent, a
//! single object, or an array, and numbers are strings. The raw wire types
//! below absorb all of that; normalization produces the stable shapes the
//! site consumes.

use crate::utils::error::{GatewayError, Result};
use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Client for the LastFM web service
#[derive(Clone)]
pub struct LastfmClient {
    http: reqwest::Client,
    api_base: String,
}

impl LastfmClient {
    /// Create a client against the given API endpoint
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    /// Fetch and normalize the user's recently played tracks
    pub async fn recent_tracks(
        &self,
        api_key: &str,
        username: &str,
        limit: u32,
    ) -> Result<RecentTracks> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(&self.api_base)
            .query(&[
                ("method", "user.getrecenttracks"),
                ("user", username),
                ("api_key", api_key),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("LastFM API error: {} {}", status, body);
            return Err(GatewayError::Upstream(format!(
                "LastFM API responded with status: {}",
                status
            )));
        }

        let envelope: RecentTracksEnvelope = response.json().await?;
        if let Some(code) = envelope.error {
            return Err(translate_error(code, envelope.message.as_deref(), username));
        }

        let payload = envelope.recenttracks.unwrap_or_default();
        let tracks: Vec<RecentTrack> = payload
            .track
            .into_vec()
            .into_iter()
            .map(RawRecentTrack::normalize)
            .collect();

        let attr = payload.attr.unwrap_or_default();
        Ok(RecentTracks {
            total: attr.total(tracks.len()),
            user: attr.user(username),
            tracks,
        })
    }

    /// Fetch and normalize the user's top tracks for a period
    pub async fn top_tracks(
        &self,
        api_key: &str,
        username: &str,
        period: &str,
        limit: u32,
    ) -> Result<TopTracks> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(&self.api_base)
            .query(&[
                ("method", "user.gettoptracks"),
                ("user", username),
                ("api_key", api_key),
                ("format", "json"),
                ("period", period),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "LastFM API responded with status: {}",
                status
            )));
        }

        let envelope: TopTracksEnvelope = response.json().await?;
        if let Some(code) = envelope.error {
            return Err(translate_error(code, envelope.message.as_deref(), username));
        }

        let payload = envelope.toptracks.unwrap_or_default();
        let tracks: Vec<TopTrack> = payload
            .track
            .into_vec()
            .into_iter()
            .map(RawTopTrack::normalize)
            .collect();

        let attr = payload.attr.unwrap_or_default();
        Ok(TopTracks {
            total: attr.total(tracks.len()),
            user: attr.user(username),
            tracks,
        })
    }
}

/// Map a LastFM error envelope to the gateway error contract
///
/// Codes 6, 10, and 29 have dedicated mappings; everything else passes the
/// upstream message through with the raw code attached.
pub fn translate_error(code: i64, message: Option<&str>, username: &str) -> GatewayError {
    match code {
        6 => GatewayError::LastfmApi {
            status: 404,
            code: "USER_NOT_FOUND",
            message: format!("LastFM user \"{}\" not found", username),
            lastfm_code: None,
        },
        10 => GatewayError::LastfmApi {
            status: 500,
            code: "INVALID_API_KEY",
            message: "Invalid LastFM API key".to_string(),
            lastfm_code: None,
        },
        29 => GatewayError::LastfmApi {
            status: 429,
            code: "RATE_LIMIT_EXCEEDED",
            message: "LastFM API rate limit exceeded".to_string(),
            lastfm_code: None,
        },
        other => GatewayError::LastfmApi {
            status: 400,
            code: "API_ERROR",
            message: message.unwrap_or("LastFM API error").to_string(),
            lastfm_code: Some(other),
        },
    }
}

// ============================================================================
// Normalized output
// ============================================================================

/// Recently played tracks with list-level attributes
#[derive(Debug, Clone)]
pub struct RecentTracks {
    pub tracks: Vec<RecentTrack>,
    pub total: u64,
    pub user: String,
}

/// One recently played track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTrack {
    pub name: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// ISO-8601 scrobble time; null while the track is still playing
    pub date: Option<String>,
    #[serde(rename = "nowPlaying")]
    pub now_playing: bool,
}

/// Top tracks with list-level attributes
#[derive(Debug, Clone)]
pub struct TopTracks {
    pub tracks: Vec<TopTrack>,
    pub total: u64,
    pub user: String,
}

/// One top track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTrack {
    pub name: String,
    pub artist: String,
    pub playcount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Chart position; null when absent or non-numeric upstream
    pub rank: Option<u64>,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecentTracksEnvelope {
    error: Option<i64>,
    message: Option<String>,
    recenttracks: Option<RawRecentTracks>,
}

#[derive(Debug, Deserialize)]
struct TopTracksEnvelope {
    error: Option<i64>,
    message: Option<String>,
    toptracks: Option<RawTopTracks>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRecentTracks {
    #[serde(default)]
    pub(crate) track: OneOrMany<RawRecentTrack>,
    #[serde(rename = "@attr", default)]
    pub(crate) attr: Option<RawListAttr>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTopTracks {
    #[serde(default)]
    pub(crate) track: OneOrMany<RawTopTrack>,
    #[serde(rename = "@attr", default)]
    pub(crate) attr: Option<RawListAttr>,
}

/// A value LastFM renders either as a single object or as an array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// A value LastFM renders either as a bare string or as `{"#text": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TextValue {
    Tagged {
        #[serde(rename = "#text")]
        text: String,
    },
    Plain(String),
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            TextValue::Tagged { text } => text,
            TextValue::Plain(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawListAttr {
    user: Option<String>,
    total: Option<String>,
}

impl RawListAttr {
    fn total(&self, fallback: usize) -> u64 {
        self.total
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(fallback as u64)
    }

    fn user(&self, fallback: &str) -> String {
        self.user.clone().unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    #[serde(rename = "#text", default)]
    url: String,
    #[allow(dead_code)]
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDate {
    uts: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRecentTrack {
    name: String,
    artist: TextValue,
    #[serde(default)]
    album: Option<TextValue>,
    #[serde(default)]
    image: Vec<RawImage>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    date: Option<RawDate>,
    #[serde(rename = "@attr", default)]
    attr: Option<RawNowPlayingAttr>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNowPlayingAttr {
    nowplaying: Option<String>,
}

impl RawRecentTrack {
    fn normalize(self) -> RecentTrack {
        let now_playing = self
            .attr
            .and_then(|a| a.nowplaying)
            .is_some_and(|v| v == "true");

        let date = self
            .date
            .and_then(|d| d.uts.parse::<i64>().ok())
            .and_then(|uts| Utc.timestamp_opt(uts, 0).single())
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

        RecentTrack {
            name: self.name,
            artist: self.artist.into_string(),
            album: self
                .album
                .map(TextValue::into_string)
                .filter(|s| !s.is_empty()),
            image: pick_image(&self.image),
            url: self.url,
            date,
            now_playing,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRankAttr {
    rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopTrack {
    name: String,
    artist: RawTopArtist,
    #[serde(default)]
    playcount: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image: Vec<RawImage>,
    #[serde(rename = "@attr", default)]
    attr: Option<RawRankAttr>,
}

impl RawTopTrack {
    fn normalize(self) -> TopTrack {
        TopTrack {
            name: self.name,
            artist: self.artist.name,
            playcount: self.playcount.and_then(|p| p.parse().ok()),
            url: self.url,
            image: pick_image(&self.image),
            rank: self
                .attr
                .and_then(|a| a.rank)
                .and_then(|r| r.parse().ok()),
        }
    }
}

/// Prefer the medium-resolution tier (index 2), falling back to small (index 1)
fn pick_image(images: &[RawImage]) -> Option<String> {
    images
        .get(2)
        .filter(|i| !i.url.is_empty())
        .or_else(|| images.get(1).filter(|i| !i.url.is_empty()))
        .map(|i| i.url.clone())
}
