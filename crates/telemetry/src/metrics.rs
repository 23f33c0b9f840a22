//! Internal metrics collection.
//!
//! Counters live in-process and are exposed as a JSON snapshot on the
//! internal listener. They are never visible on the decoy surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A point-in-time value, overwritten on each update.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the capture pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Capture metrics
    pub requests_received: Counter,
    pub requests_throttled: Counter,
    pub requests_served: Counter,
    pub requests_not_found: Counter,
    pub credential_submissions: Counter,

    // Classification metrics
    pub classified_path_traversal: Counter,
    pub classified_sqli: Counter,
    pub classified_xss: Counter,
    pub classified_common_scan: Counter,
    pub classified_credential_attempt: Counter,
    pub classified_unknown: Counter,

    // Event sink metrics
    pub events_written: Counter,
    pub sink_errors: Counter,

    // Latency histograms
    pub capture_latency_ms: Histogram,
    pub sink_latency_ms: Histogram,

    // Gauges
    pub rate_windows: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter for a classification label as written to the store.
    pub fn classification_counter(&self, label: &str) -> &Counter {
        match label {
            "path_traversal" => &self.classified_path_traversal,
            "sqli" => &self.classified_sqli,
            "xss" => &self.classified_xss,
            "common_scan" => &self.classified_common_scan,
            "credential_attempt" => &self.classified_credential_attempt,
            _ => &self.classified_unknown,
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub requests_received: u64,
    pub requests_throttled: u64,
    pub requests_served: u64,
    pub requests_not_found: u64,
    pub credential_submissions: u64,
    pub classifications: ClassificationCounts,
    pub events_written: u64,
    pub sink_errors: u64,
    pub capture_latency_mean_ms: f64,
    pub sink_latency_mean_ms: f64,
    pub rate_windows: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub path_traversal: u64,
    pub sqli: u64,
    pub xss: u64,
    pub common_scan: u64,
    pub credential_attempt: u64,
    pub unknown: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            requests_received: self.requests_received.get(),
            requests_throttled: self.requests_throttled.get(),
            requests_served: self.requests_served.get(),
            requests_not_found: self.requests_not_found.get(),
            credential_submissions: self.credential_submissions.get(),
            classifications: ClassificationCounts {
                path_traversal: self.classified_path_traversal.get(),
                sqli: self.classified_sqli.get(),
                xss: self.classified_xss.get(),
                common_scan: self.classified_common_scan.get(),
                credential_attempt: self.classified_credential_attempt.get(),
                unknown: self.classified_unknown.get(),
            },
            events_written: self.events_written.get(),
            sink_errors: self.sink_errors.get(),
            capture_latency_mean_ms: self.capture_latency_ms.mean(),
            sink_latency_mean_ms: self.sink_latency_ms.mean(),
            rate_windows: self.rate_windows.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
