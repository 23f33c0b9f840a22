//! Mock implementations for testing.

use async_trait::async_trait;
use event_sink::EventSink;
use parking_lot::Mutex;
use snare_core::{error::SinkErrorCode, Error, Event, Result};
use std::sync::Arc;

/// Mock sink that keeps events in memory.
///
/// Implements the same `EventSink` trait as `JsonlSink`, so tests see the
/// exact records that would be appended to the log.
#[derive(Clone, Default)]
pub struct MockSink {
    events: Arc<Mutex<Vec<Event>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events.
    pub fn captured_events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Get the count of captured events.
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Most recent event, if any.
    pub fn last_event(&self) -> Option<Event> {
        self.events.lock().last().cloned()
    }

    /// Clear captured events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Make subsequent writes fail.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl EventSink for MockSink {
    async fn write(&self, event: &Event) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::sink(SinkErrorCode::AppendFailed, "Mock failure"));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}
