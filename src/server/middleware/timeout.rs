//! Request timeout middleware
//!
//! Bounds how long the downstream pipeline may run. The downstream future is
//! spawned onto the arbiter and raced against the deadline, so exactly one
//! terminal response is written: either the downstream result or a 408. A
//! fired deadline stops waiting without aborting the in-flight work; the
//! detached task's eventual result is discarded.

use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures::future::{Ready, ready};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

/// Deadline middleware for Actix-web
pub struct TimeoutMiddleware {
    timeout: Duration,
}

impl TimeoutMiddleware {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TimeoutMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TimeoutMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimeoutMiddlewareService {
            service,
            timeout: self.timeout,
        }))
    }
}

/// Service implementation for the timeout middleware
pub struct TimeoutMiddlewareService<S> {
    service: S,
    timeout: Duration,
}

impl<S, B> Service<ServiceRequest> for TimeoutMiddlewareService<S>
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
        let http_req = req.request().clone();
        let timeout = self.timeout;
        let fut = self.service.call(req);

        Box::pin(async move {
            let downstream = actix_web::rt::spawn(fut);

            match tokio::time::timeout(timeout, downstream).await {
                Ok(Ok(Ok(res))) => Ok(res.map_into_left_body()),
                Ok(Ok(Err(err))) => Err(err),
                Ok(Err(join_err)) => Err(actix_web::error::ErrorInternalServerError(join_err)),
                Err(_elapsed) => {
                    // Dropping the join handle detaches the downstream task;
                    // it keeps running and its response is discarded.
                    warn!(
                        "Request to {} timed out after {}ms",
                        http_req.path(),
                        timeout.as_millis()
                    );

                    let response = HttpResponse::RequestTimeout().json(json!({
                        "error": "Request timeout",
                        "message": format!("Request took longer than {}ms", timeout.as_millis()),
                    }));
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}
