//! Newline-delimited JSON file sink.

use async_trait::async_trait;
use snare_core::error::SinkErrorCode;
use snare_core::{Error, Event, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use telemetry::{health, metrics};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::SinkConfig;
use crate::EventSink;

/// Appends one JSON object per line to a file opened in append mode.
///
/// The file handle sits behind an async mutex; each record is serialized
/// first and then written with a single `write_all` while the lock is held.
pub struct JsonlSink {
    path: PathBuf,
    file: Mutex<File>,
    sync_data: bool,
    healthy: AtomicBool,
}

impl JsonlSink {
    /// Open (or create) the event log, creating parent directories.
    pub async fn open(config: &SinkConfig) -> Result<Self> {
        let file = open_append(&config.path).await?;

        info!(path = %config.path.display(), "Event log opened");
        health().event_sink.set_healthy();

        Ok(Self {
            path: config.path.clone(),
            file: Mutex::new(file),
            sync_data: config.sync_data,
            healthy: AtomicBool::new(true),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, line: &[u8]) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(line).await?;
        file.flush().await?;
        if self.sync_data {
            file.sync_data().await?;
        }
        Ok(())
    }
}

pub(crate) async fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::sink(
                SinkErrorCode::OpenFailed,
                format!("Failed to create {}: {}", parent.display(), e),
            )
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| {
            Error::sink(
                SinkErrorCode::OpenFailed,
                format!("Failed to open {}: {}", path.display(), e),
            )
        })
}

#[async_trait]
impl EventSink for JsonlSink {
    async fn write(&self, event: &Event) -> Result<()> {
        let start = Instant::now();

        let mut line = event.to_json_line()?;
        line.push('\n');

        match self.append(line.as_bytes()).await {
            Ok(()) => {
                if !self.healthy.swap(true, Ordering::Relaxed) {
                    info!("Event log writable again");
                    health().event_sink.set_healthy();
                }
                metrics().events_written.inc();
                metrics()
                    .sink_latency_ms
                    .observe(start.elapsed().as_millis() as u64);
                debug!(event_id = %event.event_id, "Event appended");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to append event");
                self.healthy.store(false, Ordering::Relaxed);
                health().event_sink.set_unhealthy(e.to_string());
                metrics().sink_errors.inc();
                Err(Error::sink(SinkErrorCode::AppendFailed, e.to_string()))
            }
        }
    }

    fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }
}
