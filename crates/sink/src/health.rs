//! Event store health checks.

use crate::config::SinkConfig;
use crate::jsonl::open_append;
use tracing::{debug, error};

/// Check that the event log can be opened for appending.
pub async fn check_writable(config: &SinkConfig) -> bool {
    match open_append(&config.path).await {
        Ok(_) => {
            debug!(path = %config.path.display(), "Event log writable");
            true
        }
        Err(e) => {
            error!("Event log not writable: {}", e);
            false
        }
    }
}
