//! Rate limiting middleware
//!
//! Wraps a [`SlidingWindowLimiter`] around the downstream pipeline. Two
//! instances are active at once: one scoped to the /lastfm prefix and a
//! looser one covering every route. The scoped instance runs first, and its
//! log is not rolled back if the general limiter rejects afterwards.

use crate::core::rate_limiter::SlidingWindowLimiter;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use chrono::{SecondsFormat, Utc};
use futures::future::{Ready, ready};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// Rate limit middleware for Actix-web
pub struct RateLimitMiddleware {
    limiter: SlidingWindowLimiter,
    scope: Option<String>,
}

impl RateLimitMiddleware {
    /// Limit every request passing through this middleware
    pub fn new(limiter: SlidingWindowLimiter) -> Self {
        Self {
            limiter,
            scope: None,
        }
    }

    /// Limit only requests whose path starts with `prefix`
    pub fn scoped(prefix: impl Into<String>, limiter: SlidingWindowLimiter) -> Self {
        Self {
            limiter,
            scope: Some(prefix.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
            scope: self.scope.clone(),
        }))
    }
}

/// Service implementation for the rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: SlidingWindowLimiter,
    scope: Option<String>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(prefix) = &self.scope {
            if !req.path().starts_with(prefix.as_str()) {
                let fut = self.service.call(req);
                return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
            }
        }

        let key = client_key(&req);
        let decision = self.limiter.admit(&key, Utc::now());

        if !decision.allowed {
            let retry_after = decision.retry_after_secs.unwrap_or(1);
            warn!(
                "Rate limit exceeded for {} on {}: retry after {}s",
                key,
                req.path(),
                retry_after
            );

            let response = HttpResponse::TooManyRequests().json(json!({
                "error": "Too many requests",
                "retryAfter": retry_after,
            }));
            let (http_req, _) = req.into_parts();
            return Box::pin(ready(Ok(
                ServiceResponse::new(http_req, response).map_into_right_body()
            )));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;

            // On routes covered by both limiters the general (inner) one has
            // already stamped the budget; its headers win.
            let headers = res.headers_mut();
            if !headers.contains_key("x-ratelimit-limit") {
                headers.insert(
                    HeaderName::from_static("x-ratelimit-limit"),
                    HeaderValue::from(decision.limit),
                );
                headers.insert(
                    HeaderName::from_static("x-ratelimit-remaining"),
                    HeaderValue::from(decision.remaining),
                );
                if let Ok(reset) = HeaderValue::from_str(
                    &decision.reset_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                ) {
                    headers.insert(HeaderName::from_static("x-ratelimit-reset"), reset);
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}

/// Partition key for rate limiting: the peer's IP address
///
/// Clients behind a shared NAT collapse into one key; acceptable for a
/// single-instance personal site.
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
