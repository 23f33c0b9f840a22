//! Application state shared across handlers.

use crate::decoys::{DecoyTable, DEFAULT_DECOY_PATHS};
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};
use event_sink::EventSink;
use snare_core::{Classifier, Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Interval between stale rate-window sweeps.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Event sink (JSONL file in production, mock in tests)
    pub sink: Arc<dyn EventSink>,
    /// Rate limiter
    pub rate_limiter: SharedRateLimiter,
    /// Ordered classification rules
    pub classifier: Arc<Classifier>,
    /// Paths answered with a decoy page
    pub decoys: Arc<DecoyTable>,
    /// Time source for event stamps and rate windows
    pub clock: Arc<dyn Clock>,
    /// Take the client identity from `X-Forwarded-For` when present
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_rate_limit(sink, RateLimitConfig::default())
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(sink: Arc<dyn EventSink>, rate_config: RateLimitConfig) -> Self {
        Self {
            sink,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
            classifier: Arc::new(Classifier::default()),
            decoys: Arc::new(DecoyTable::from_paths(DEFAULT_DECOY_PATHS)),
            clock: Arc::new(SystemClock),
            trust_forwarded_for: true,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_decoys(mut self, decoys: DecoyTable) -> Self {
        self.decoys = Arc::new(decoys);
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        let clock = self.clock.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                let removed = rate_limiter.cleanup_stale(clock.now());
                if removed > 0 {
                    debug!(
                        removed,
                        remaining = rate_limiter.window_count(),
                        "Evicted stale rate windows"
                    );
                }
            }
        })
    }
}
