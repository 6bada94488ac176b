//! HTTP route handlers for the service surface itself

use actix_web::HttpResponse;
use serde_json::json;

/// Service banner at the root
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "folio-gateway",
        "version": crate::VERSION,
        "docs": "/"
    }))
}

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": crate::VERSION
    }))
}

/// Fallback for unmatched routes: a directory of known endpoints
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Endpoint not found",
        "code": "NOT_FOUND",
        "availableEndpoints": {
            "root": "/",
            "health": "/health",
            "lastfm": {
                "recent": "/lastfm/recent",
                "topTracks": "/lastfm/top-tracks"
            },
            "discord": {
                "profile": "/discord/profile"
            }
        }
    }))
}
