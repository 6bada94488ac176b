//! Middleware tests

use super::{RateLimitMiddleware, SecurityHeadersMiddleware, TimeoutMiddleware};
use crate::config::RateLimitConfig;
use crate::core::rate_limiter::SlidingWindowLimiter;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;

fn limiter(max_requests: u32) -> SlidingWindowLimiter {
    SlidingWindowLimiter::new(RateLimitConfig {
        window_secs: 900,
        max_requests,
    })
}

async fn ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({"ok": true}))
}

async fn slow() -> HttpResponse {
    tokio::time::sleep(Duration::from_millis(200)).await;
    HttpResponse::Ok().json(json!({"ok": true}))
}

#[actix_web::test]
async fn security_headers_are_attached_to_every_response() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeadersMiddleware)
            .route("/", web::get().to(ok)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(
        headers.get("strict-transport-security").unwrap(),
        "max-age=31536000; includeSubDomains"
    );
    assert_eq!(
        headers.get("content-security-policy").unwrap(),
        "default-src 'self'"
    );
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
}

#[actix_web::test]
async fn rate_limit_rejects_over_budget_with_retry_after() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(limiter(2)))
            .route("/", web::get().to(ok)),
    )
    .await;

    for _ in 0..2 {
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Too many requests"));
    assert!(body["retryAfter"].as_u64().unwrap() >= 1);
}

#[actix_web::test]
async fn admitted_requests_carry_rate_limit_headers() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(limiter(5)))
            .route("/", web::get().to(ok)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let headers = resp.headers();
    assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "5");
    assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "4");
    assert!(headers.contains_key("x-ratelimit-reset"));
}

#[actix_web::test]
async fn scoped_limiter_ignores_other_paths() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::scoped("/lastfm", limiter(1)))
            .route("/lastfm/recent", web::get().to(ok))
            .route("/other", web::get().to(ok)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/lastfm/recent").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/lastfm/recent").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // Out-of-scope traffic is never counted against the budget
    for _ in 0..3 {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/other").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!resp.headers().contains_key("x-ratelimit-limit"));
    }
}

#[actix_web::test]
async fn rate_limit_keys_are_per_client_address() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(limiter(1)))
            .route("/", web::get().to(ok)),
    )
    .await;

    let addr_a: SocketAddr = "10.0.0.1:5000".parse().unwrap();
    let addr_b: SocketAddr = "10.0.0.2:5000".parse().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/").peer_addr(addr_a).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/").peer_addr(addr_a).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client address still has budget
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/").peer_addr(addr_b).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn deadline_fires_with_408_when_downstream_is_slow() {
    let app = test::init_service(
        App::new()
            .wrap(TimeoutMiddleware::new(Duration::from_millis(50)))
            .route("/", web::get().to(slow)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Request timeout"));
    assert_eq!(body["message"], json!("Request took longer than 50ms"));

    // The detached downstream task finishes later; its result must be
    // discarded without a second response or a panic.
    tokio::time::sleep(Duration::from_millis(250)).await;
}

#[actix_web::test]
async fn completion_before_deadline_never_yields_408() {
    let app = test::init_service(
        App::new()
            .wrap(TimeoutMiddleware::new(Duration::from_secs(5)))
            .route("/", web::get().to(ok)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], json!(true));
}
