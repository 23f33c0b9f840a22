//! Fixed-window rate limiting.
//!
//! Counts requests per `(identity, UTC minute)`. A new minute is a new key,
//! so windows never need resetting; stale keys are evicted instead.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snare_core::limits::{DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_WINDOW_RETENTION_MINUTES};
use std::collections::HashMap;
use std::sync::Arc;
use telemetry::metrics;

/// Per-identity request counter for fixed one-minute windows.
pub struct RateLimiter {
    windows: Mutex<Windows>,
    config: RateLimitConfig,
}

#[derive(Default)]
struct Windows {
    counts: HashMap<WindowKey, u32>,
    /// Minute of the last capacity-triggered sweep. What a sweep can remove
    /// depends only on the minute, so one per minute is enough.
    swept_minute: Option<i64>,
    #[cfg(test)]
    sweeps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per identity per minute
    #[serde(default = "default_max_requests")]
    pub max_requests_per_minute: u32,
    /// Minutes a window is kept before eviction
    #[serde(default = "default_retention")]
    pub retention_minutes: i64,
    /// Window count that triggers eviction inside `admit`. While the map is
    /// full of live windows, identities without a window are refused.
    #[serde(default = "default_max_windows")]
    pub max_windows: usize,
}

fn default_max_requests() -> u32 {
    DEFAULT_REQUESTS_PER_MINUTE
}

fn default_retention() -> i64 {
    DEFAULT_WINDOW_RETENTION_MINUTES
}

fn default_max_windows() -> usize {
    100_000
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_minute: default_max_requests(),
            retention_minutes: default_retention(),
            max_windows: default_max_windows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    identity: String,
    minute: i64,
}

/// Whole UTC minutes since the epoch.
fn minute_bucket(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(60)
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(Windows::default()),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request and decide admission.
    ///
    /// The counter is incremented before the test, so rejected requests
    /// still occupy their window (hard cap, no backoff).
    pub fn admit(&self, identity: &str, now: DateTime<Utc>) -> bool {
        let minute = minute_bucket(now);
        let mut windows = self.windows.lock();
        let key = WindowKey {
            identity: identity.to_string(),
            minute,
        };

        if !windows.counts.contains_key(&key) && windows.counts.len() >= self.config.max_windows {
            if windows.swept_minute != Some(minute) {
                windows.swept_minute = Some(minute);
                self.evict(&mut windows, minute);
            }
            if windows.counts.len() >= self.config.max_windows {
                metrics().rate_windows.set(windows.counts.len() as u64);
                return false;
            }
        }

        let count = windows.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        let admitted = *count <= self.config.max_requests_per_minute;

        metrics().rate_windows.set(windows.counts.len() as u64);
        admitted
    }

    /// Requests counted for `identity` in the window containing `now`.
    pub fn current_count(&self, identity: &str, now: DateTime<Utc>) -> u32 {
        let key = WindowKey {
            identity: identity.to_string(),
            minute: minute_bucket(now),
        };
        self.windows.lock().counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.windows.lock().counts.len()
    }

    /// Evict windows older than the retention period. Returns how many
    /// were removed.
    pub fn cleanup_stale(&self, now: DateTime<Utc>) -> usize {
        let mut windows = self.windows.lock();
        let removed = self.evict(&mut windows, minute_bucket(now));
        metrics().rate_windows.set(windows.counts.len() as u64);
        removed
    }

    fn evict(&self, windows: &mut Windows, current_minute: i64) -> usize {
        #[cfg(test)]
        {
            windows.sweeps += 1;
        }
        let before = windows.counts.len();
        let retention = self.config.retention_minutes.max(1);
        windows
            .counts
            .retain(|key, _| current_minute - key.minute < retention);
        before - windows.counts.len()
    }

    #[cfg(test)]
    fn sweeps(&self) -> usize {
        self.windows.lock().sweeps
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
