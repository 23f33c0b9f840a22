//! Event store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON-lines sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Path of the event log
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Call `fdatasync` after each append
    #[serde(default)]
    pub sync_data: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("logs/events.jsonl")
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            sync_data: false,
        }
    }
}
