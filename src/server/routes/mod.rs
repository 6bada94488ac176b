//! HTTP route modules
//!
//! One module per proxied upstream, plus the shared error-to-response
//! helper all handlers funnel failures through.

pub mod discord;
pub mod lastfm;

/// Error response rendering shared by the route handlers
pub mod errors {
    use crate::utils::error::GatewayError;
    use actix_web::HttpResponse;
    use serde_json::json;

    /// Render a [`GatewayError`] as the gateway's JSON error contract
    ///
    /// Errors with a definite shape (missing configuration, translated
    /// LastFM envelopes) keep their own status, code, and message. Anything
    /// else becomes a 500 with the route's `fallback` message; the raw error
    /// is echoed under `details` only in development mode.
    pub fn error_response(
        err: &GatewayError,
        fallback: &str,
        dev_mode: bool,
    ) -> HttpResponse {
        match err {
            GatewayError::Config { code, message } => {
                HttpResponse::InternalServerError().json(json!({
                    "error": message,
                    "code": code,
                }))
            }
            GatewayError::LastfmApi {
                code,
                message,
                lastfm_code,
                ..
            } => {
                let mut body = json!({
                    "error": message,
                    "code": code,
                });
                if let Some(raw) = lastfm_code {
                    body["lastfmCode"] = json!(raw);
                }
                HttpResponse::build(err.status_code()).json(body)
            }
            _ => {
                let mut body = json!({ "error": fallback });
                if dev_mode {
                    body["details"] = json!(err.to_string());
                }
                HttpResponse::InternalServerError().json(body)
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use actix_web::http::StatusCode;

        #[test]
        fn transport_errors_hide_details_outside_development() {
            let err = GatewayError::Upstream("LastFM API responded with status: 502".into());

            let resp = error_response(&err, "Failed to fetch recent tracks", false);
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let resp = error_response(&err, "Failed to fetch recent tracks", true);
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }

        #[test]
        fn translated_errors_keep_status_and_code() {
            let err = GatewayError::LastfmApi {
                status: 429,
                code: "RATE_LIMIT_EXCEEDED",
                message: "LastFM API rate limit exceeded".into(),
                lastfm_code: None,
            };
            let resp = error_response(&err, "unused", false);
            assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        }
    }
}
