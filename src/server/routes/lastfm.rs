//! LastFM proxy endpoints

use super::errors;
use crate::core::upstream::{RecentTrack, TopTrack};
use crate::server::AppState;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

/// Configure LastFM routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lastfm")
            .route("/recent", web::get().to(recent_tracks))
            .route("/top-tracks", web::get().to(top_tracks)),
    );
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct TopTracksQuery {
    #[serde(default = "default_period")]
    period: String,
    #[serde(default = "default_top_limit")]
    limit: u32,
}

#[derive(Debug, Serialize)]
struct RecentTracksResponse {
    tracks: Vec<RecentTrack>,
    total: u64,
    user: String,
    success: bool,
}

#[derive(Debug, Serialize)]
struct TopTracksResponse {
    tracks: Vec<TopTrack>,
    total: u64,
    user: String,
    period: String,
    success: bool,
}

/// Recently played tracks, optionally flagged as now playing
pub async fn recent_tracks(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> HttpResponse {
    let dev_mode = state.config.server.dev_mode;

    let (api_key, username) = match state.config.lastfm.credentials() {
        Ok(creds) => creds,
        Err(err) => return errors::error_response(&err, "Failed to fetch recent tracks", dev_mode),
    };

    match state
        .lastfm
        .recent_tracks(&api_key, &username, query.limit)
        .await
    {
        Ok(recent) if recent.tracks.is_empty() => HttpResponse::Ok().json(json!({
            "tracks": [],
            "message": "No recent tracks found",
            "total": 0
        })),
        Ok(recent) => HttpResponse::Ok().json(RecentTracksResponse {
            tracks: recent.tracks,
            total: recent.total,
            user: recent.user,
            success: true,
        }),
        Err(err) => {
            error!("LastFM recent tracks error: {}", err);
            errors::error_response(&err, "Failed to fetch recent tracks", dev_mode)
        }
    }
}

/// Most played tracks over a period
pub async fn top_tracks(
    state: web::Data<AppState>,
    query: web::Query<TopTracksQuery>,
) -> HttpResponse {
    let dev_mode = state.config.server.dev_mode;

    let (api_key, username) = match state.config.lastfm.credentials() {
        Ok(creds) => creds,
        Err(err) => return errors::error_response(&err, "Failed to fetch top tracks", dev_mode),
    };

    let TopTracksQuery { period, limit } = query.into_inner();

    match state
        .lastfm
        .top_tracks(&api_key, &username, &period, limit)
        .await
    {
        Ok(top) => HttpResponse::Ok().json(TopTracksResponse {
            tracks: top.tracks,
            total: top.total,
            user: top.user,
            period,
            success: true,
        }),
        Err(err) => {
            error!("LastFM top tracks error: {}", err);
            errors::error_response(&err, "Failed to fetch top tracks", dev_mode)
        }
    }
}

fn default_recent_limit() -> u32 {
    1
}

fn default_period() -> String {
    "7day".to_string()
}

fn default_top_limit() -> u32 {
    10
}
