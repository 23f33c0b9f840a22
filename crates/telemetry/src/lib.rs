//! Internal telemetry for the snare deception endpoint.
//!
//! Structured logs, in-process counters, and component health. None of it
//! is reachable from the decoy listener.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
