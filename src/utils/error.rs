//! Error handling for the gateway
//!
//! All failures a request can hit are funneled through [`GatewayError`] so
//! route handlers can render the one JSON error contract the site's frontend
//! expects: `{error, code?, details?}`, with `details` only in development
//! mode.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Deployment configuration errors (missing secrets, bad values)
    #[error("{message}")]
    Config {
        /// Symbolic error code surfaced to clients
        code: &'static str,
        message: String,
    },

    /// HTTP client errors (upstream transport failures)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Upstream responded outside its documented contract
    #[error("{0}")]
    Upstream(String),

    /// Structured LastFM error envelope, already translated
    #[error("{message}")]
    LastfmApi {
        status: u16,
        code: &'static str,
        message: String,
        /// Raw upstream code, echoed for unmapped errors
        lastfm_code: Option<i64>,
    },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server lifecycle errors (bind failures, runtime shutdown)
    #[error("Server error: {0}")]
    Server(String),
}

impl GatewayError {
    /// Configuration error with a symbolic code
    pub fn config(code: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::LastfmApi { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Symbolic code for the JSON body, when the error carries one
    ///
    /// Transport-level upstream failures intentionally have none; they render
    /// as a route-specific generic message instead.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            GatewayError::Config { code, .. } => Some(code),
            GatewayError::LastfmApi { code, .. } => Some(code),
            GatewayError::HttpClient(_) | GatewayError::Upstream(_) => None,
            _ => Some("INTERNAL_ERROR"),
        }
    }
}

/// Translate JSON body extraction failures into the gateway error contract.
///
/// Wired into [`actix_web::web::JsonConfig`]; oversized payloads become 413,
/// everything else 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (status, body) = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            json!({
                "error": "Request entity too large",
                "code": "PAYLOAD_TOO_LARGE",
            }),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid JSON in request body",
                "code": "INVALID_JSON",
            }),
        ),
    };

    InternalError::from_response(err, HttpResponse::build(status).json(body)).into()
}

/// Translate query string extraction failures into the JSON error contract
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = json!({
        "error": err.to_string(),
        "code": "INVALID_QUERY",
    });

    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
