//! Capture to file, then aggregate and report.

use analysis::{read_file, report, Aggregation, Aggregator};
use chrono::Duration;
use integration_tests::{fixtures, setup::FileContext};
use std::fs;
use std::io::Write;

#[tokio::test]
async fn test_captured_log_aggregates() {
    let ctx = FileContext::new().await;

    for n in 1..=3 {
        ctx.server
            .get("/wp-login.php")
            .add_header("X-Forwarded-For", &fixtures::client_ip(n))
            .add_header("User-Agent", "curl/8.4.0")
            .await;
    }
    ctx.clock.advance(Duration::hours(1));
    ctx.server
        .post("/login")
        .add_header("X-Forwarded-For", &fixtures::client_ip(1))
        .form(&fixtures::login_form("admin", "admin"))
        .await;

    let outcome = read_file(&ctx.log_path).unwrap();
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.malformed_lines, 0);

    let aggregation = Aggregator::default().aggregate(&outcome.records);
    let summary = aggregation.summary().expect("expected a summary");

    assert_eq!(summary.total_events, 4);
    assert_eq!(summary.distinct_identities, 3);
    assert_eq!(summary.distinct_credentials, 1);
    assert_eq!(summary.top_identities[0].key, fixtures::client_ip(1));
    assert_eq!(summary.top_identities[0].count, 2);
    assert_eq!(summary.top_paths[0].key, "/wp-login.php");
    assert_eq!(summary.top_classifications[0].key, "common_scan");
    assert_eq!(summary.top_agents[0].key, "tool");
    assert_eq!(summary.hourly_counts.len(), 2);

    let written = report::write_report(summary, &ctx.report_dir()).unwrap();
    assert_eq!(written.len(), 6);
    let text = fs::read_to_string(ctx.report_dir().join(report::SUMMARY_FILE)).unwrap();
    assert!(text.contains("- Total events: **4**"));
    assert!(!text.contains("admin:admin"));
}

#[tokio::test]
async fn test_bad_lines_and_timestamps() {
    let ctx = FileContext::new().await;
    ctx.server.get("/admin").await;
    ctx.server.get("/console").await;

    let mut file = fs::OpenOptions::new().append(true).open(&ctx.log_path).unwrap();
    writeln!(file, "{{truncated").unwrap();
    writeln!(
        file,
        r#"{{"ts":"not a time","ip":"198.51.100.99","path":"/hidden","classification":"xss"}}"#
    )
    .unwrap();

    let outcome = read_file(&ctx.log_path).unwrap();
    assert_eq!(outcome.malformed_lines, 1);
    assert_eq!(outcome.records.len(), 3);

    let summary = match Aggregator::default().aggregate(&outcome.records) {
        Aggregation::Summary(summary) => summary,
        Aggregation::NoData { .. } => panic!("expected a summary"),
    };
    assert_eq!(summary.total_events, 2);
    assert_eq!(summary.excluded_events, 1);
    assert!(summary.top_paths.iter().all(|row| row.key != "/hidden"));
    assert!(summary.top_identities.iter().all(|row| row.key != "198.51.100.99"));
}

#[tokio::test]
async fn test_empty_log_is_no_data() {
    let ctx = FileContext::new().await;

    let outcome = read_file(&ctx.log_path).unwrap();
    let aggregation = Aggregator::default().aggregate(&outcome.records);
    assert!(aggregation.is_no_data());
    assert!(!ctx.report_dir().exists());
}
