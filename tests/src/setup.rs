//! Common test setup functions.

use api::{internal_router, router, AppState, RateLimitConfig};
use axum_test::TestServer;
use event_sink::{EventSink, JsonlSink, SinkConfig};
use snare_core::{Clock, Event, FixedClock};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::fixtures::start_time;
use crate::mocks::MockSink;

/// Test context with the real router, a mock sink, and a fixed clock.
pub struct TestContext {
    pub mock_sink: Arc<MockSink>,
    pub clock: Arc<FixedClock>,
    pub state: AppState,
    pub server: TestServer,
    pub internal: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default())
    }

    pub fn with_rate_limit(rate_config: RateLimitConfig) -> Self {
        let mock_sink = Arc::new(MockSink::new());
        let clock = Arc::new(FixedClock::new(start_time()));
        let state = AppState::with_rate_limit(mock_sink.clone() as Arc<dyn EventSink>, rate_config)
            .with_clock(clock.clone() as Arc<dyn Clock>);

        let server = TestServer::new(router(state.clone())).expect("Failed to create test server");
        let internal =
            TestServer::new(internal_router(state.clone())).expect("Failed to create test server");

        Self {
            mock_sink,
            clock,
            state,
            server,
            internal,
        }
    }

    /// Get all events captured by the mock sink.
    pub fn captured_events(&self) -> Vec<Event> {
        self.mock_sink.captured_events()
    }

    pub fn last_event(&self) -> Event {
        self.mock_sink.last_event().expect("no event captured")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context writing to a real JSON-lines file in a temp directory.
pub struct FileContext {
    pub dir: TempDir,
    pub log_path: PathBuf,
    pub clock: Arc<FixedClock>,
    pub server: TestServer,
}

impl FileContext {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("logs").join("events.jsonl");
        let sink = JsonlSink::open(&SinkConfig {
            path: log_path.clone(),
            sync_data: false,
        })
        .await
        .expect("Failed to open event log");

        let clock = Arc::new(FixedClock::new(start_time()));
        let state = AppState::new(Arc::new(sink)).with_clock(clock.clone() as Arc<dyn Clock>);
        let server = TestServer::new(router(state)).expect("Failed to create test server");

        Self {
            dir,
            log_path,
            clock,
            server,
        }
    }

    pub fn report_dir(&self) -> PathBuf {
        self.dir.path().join("reports")
    }
}
