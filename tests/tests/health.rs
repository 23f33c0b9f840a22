//! Tests for the internal health and metrics endpoints.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();

    let response = ctx.internal.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some(), "Response should have 'status' field");
    assert_eq!(body["event_sink_healthy"], true);
    assert!(body["rate_windows"].is_u64());
}

#[tokio::test]
async fn test_readiness_follows_sink() {
    let ctx = TestContext::new();

    ctx.internal.get("/health/ready").await.assert_status_ok();

    ctx.mock_sink.set_should_fail(true);
    ctx.internal
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_liveness() {
    let ctx = TestContext::new();
    ctx.internal.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_count_requests() {
    let ctx = TestContext::new();
    ctx.server.get("/admin").await;

    let response = ctx.internal.get("/metrics").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body["requests_received"].as_u64().unwrap() >= 1);
    assert!(body["classifications"]["common_scan"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_rate_windows_reported() {
    let ctx = TestContext::new();
    ctx.server.get("/").add_header("X-Forwarded-For", "203.0.113.50").await;
    ctx.server.get("/").add_header("X-Forwarded-For", "203.0.113.51").await;

    let body: serde_json::Value = ctx.internal.get("/health").await.json();
    assert_eq!(body["rate_windows"], 2);
}

#[tokio::test]
async fn test_internal_routes_absent_from_decoy_listener() {
    let ctx = TestContext::new();

    for path in ["/health", "/health/ready", "/metrics"] {
        ctx.server.get(path).await.assert_status(StatusCode::NOT_FOUND);
    }
    assert_eq!(ctx.captured_events().len(), 3);
}
