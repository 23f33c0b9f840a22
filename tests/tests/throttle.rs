//! Rate limiting through the router.

use api::RateLimitConfig;
use axum::http::StatusCode;
use chrono::Duration;
use integration_tests::{fixtures, setup::TestContext};
use snare_core::Outcome;

#[tokio::test]
async fn test_sixty_first_request_is_throttled() {
    let ctx = TestContext::new();
    let ip = fixtures::client_ip(10);

    for _ in 0..60 {
        ctx.server
            .get("/admin")
            .add_header("X-Forwarded-For", &ip)
            .await
            .assert_status_ok();
    }

    let response = ctx
        .server
        .post("/login")
        .add_header("X-Forwarded-For", &ip)
        .form(&fixtures::login_form("root", "toor"))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.text(), "Too Many Requests");

    let event = ctx.last_event();
    assert_eq!(event.outcome, Outcome::Throttled);
    assert_eq!(event.classification, None);
    assert_eq!(event.status, 429);
    assert!(event.body_sample.is_empty());
    assert!(event.credential_digest.is_empty());
    assert_eq!(ctx.captured_events().len(), 61);
}

#[tokio::test]
async fn test_limit_is_per_identity() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        max_requests_per_minute: 2,
        ..Default::default()
    });
    let noisy = fixtures::client_ip(1);
    let quiet = fixtures::client_ip(2);

    for _ in 0..3 {
        ctx.server.get("/").add_header("X-Forwarded-For", &noisy).await;
    }
    ctx.server
        .get("/")
        .add_header("X-Forwarded-For", &quiet)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_next_minute_admits_again() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        max_requests_per_minute: 1,
        ..Default::default()
    });
    let ip = fixtures::client_ip(3);

    ctx.server.get("/").add_header("X-Forwarded-For", &ip).await.assert_status_ok();
    ctx.server
        .get("/")
        .add_header("X-Forwarded-For", &ip)
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // start_time is hh:mm:10, so 50 s later is the next bucket
    ctx.clock.advance(Duration::seconds(50));
    ctx.server.get("/").add_header("X-Forwarded-For", &ip).await.assert_status_ok();
}

#[tokio::test]
async fn test_throttled_unknown_path_is_still_429() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        max_requests_per_minute: 0,
        ..Default::default()
    });

    ctx.server
        .get("/does-not-exist")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(ctx.last_event().outcome, Outcome::Throttled);
}
