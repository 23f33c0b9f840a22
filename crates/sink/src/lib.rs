//! Append-only event store for the snare deception endpoint.

pub mod config;
pub mod health;
pub mod jsonl;

pub use config::*;
pub use jsonl::JsonlSink;

use async_trait::async_trait;
use snare_core::{Event, Result};

/// Durable, append-only destination for captured events.
///
/// Implementations must be safe under concurrent writers: one call appends
/// exactly one complete record, never interleaved with another.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append one event.
    async fn write(&self, event: &Event) -> Result<()>;

    /// Whether the last append succeeded.
    fn is_healthy(&self) -> bool;
}
