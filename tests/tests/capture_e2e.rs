//! End-to-end tests for the capture pipeline.
//!
//! Requests go through the real router; the mock sink records exactly what
//! would be appended to the event log.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use snare_core::{credential_digest, Classification, HttpMethod, Outcome};

#[tokio::test]
async fn test_get_decoy_page() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/admin")
        .add_header("X-Forwarded-For", "203.0.113.1")
        .add_header("User-Agent", fixtures::BROWSER_UA)
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Admin Portal (/admin)"));

    let event = ctx.last_event();
    assert_eq!(event.client_identity, "203.0.113.1");
    assert_eq!(event.method, HttpMethod::Get);
    assert_eq!(event.path, "/admin");
    assert_eq!(event.outcome, Outcome::Served);
    assert_eq!(event.status, 200);
    assert_eq!(event.user_agent, fixtures::BROWSER_UA);
    assert_eq!(event.timestamp, fixtures::start_time());
}

#[tokio::test]
async fn test_root_is_welcome_page() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Welcome"));
    assert_eq!(ctx.last_event().classification, Some(Classification::Unknown));
}

#[tokio::test]
async fn test_login_post_records_digest_and_fails() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/login")
        .add_header("X-Forwarded-For", "203.0.113.2")
        .form(&fixtures::login_form("admin", "hunter2"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Invalid username or password");

    let event = ctx.last_event();
    assert_eq!(event.classification, Some(Classification::CredentialAttempt));
    assert_eq!(event.credential_digest, credential_digest("admin", "hunter2"));
    assert!(!event.body_sample.contains("hunter2"));
    assert_eq!(event.status, 401);
}

#[tokio::test]
async fn test_phpmyadmin_probe_is_common_scan() {
    let ctx = TestContext::new();

    ctx.server
        .get("/phpmyadmin")
        .add_header("User-Agent", fixtures::SCANNER_UA)
        .await
        .assert_status_ok();

    assert_eq!(ctx.last_event().classification, Some(Classification::CommonScan));
}

#[tokio::test]
async fn test_traversal_outranks_script_tag() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/console")
        .add_query_param("file", "../../etc/passwd<script>")
        .await;
    response.assert_status_ok();

    let event = ctx.last_event();
    assert_eq!(event.classification, Some(Classification::PathTraversal));
    assert!(event.query_string.starts_with("file="));
}

#[tokio::test]
async fn test_sqli_in_form_body() {
    let ctx = TestContext::new();

    ctx.server
        .post("/wp-login.php")
        .text("username=admin' or '1'='1&password=x")
        .content_type("application/x-www-form-urlencoded")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.last_event().classification, Some(Classification::Sqli));
}

#[tokio::test]
async fn test_unknown_path_is_logged_and_404() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/.env").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not Found");

    let event = ctx.last_event();
    assert_eq!(event.outcome, Outcome::NotFound);
    assert_eq!(event.status, 404);
    assert_eq!(event.path, "/.env");
    assert!(event.classification.is_some());
}

#[tokio::test]
async fn test_response_does_not_depend_on_classification() {
    let ctx = TestContext::new();

    let plain = ctx
        .server
        .post("/login")
        .form(&fixtures::login_form("alice", "password1"))
        .await;
    let hostile = ctx
        .server
        .post("/login")
        .text("username=x&password=1 UNION SELECT password FROM users")
        .content_type("application/x-www-form-urlencoded")
        .await;

    assert_eq!(plain.status_code(), hostile.status_code());
    assert_eq!(plain.text(), hostile.text());

    let events = ctx.captured_events();
    assert_eq!(events[0].classification, Some(Classification::CredentialAttempt));
    assert_eq!(events[1].classification, Some(Classification::Sqli));
}

#[tokio::test]
async fn test_missing_identity_uses_sentinel() {
    let ctx = TestContext::new();

    ctx.server.get("/admin").await.assert_status_ok();
    assert_eq!(ctx.last_event().client_identity, "unknown");
}

#[tokio::test]
async fn test_large_body_is_bounded() {
    let ctx = TestContext::new();

    let body = format!("note={}", "A".repeat(50_000));
    ctx.server
        .post("/console")
        .text(body)
        .content_type("application/x-www-form-urlencoded")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let event = ctx.last_event();
    assert!(event.body_sample.chars().count() <= 400);
    assert!(event.credential_digest.is_empty());
}

#[tokio::test]
async fn test_sink_failure_still_answers() {
    let ctx = TestContext::new();
    ctx.mock_sink.set_should_fail(true);

    let response = ctx.server.get("/administrator").await;
    response.assert_status_ok();
    assert!(response.text().contains("Admin Portal (/administrator)"));
    assert_eq!(ctx.mock_sink.event_count(), 0);
}
