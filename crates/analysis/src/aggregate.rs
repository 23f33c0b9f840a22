//! Offline aggregation of captured events.
//!
//! Records whose timestamp is missing or unreadable are excluded from every
//! table and from the totals; only their count is reported. An input with
//! no usable record yields [`Aggregation::NoData`], which is not an error.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;
use snare_core::limits::DEFAULT_TOP_N;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

use crate::enrich::AgentClassifier;
use crate::reader::RawRecord;

const THROTTLED: &str = "THROTTLED";

/// One row of a ranked frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub key: String,
    pub count: u64,
}

/// Event count for one UTC hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: DateTime<Utc>,
    pub count: u64,
}

/// Summary of a batch of events with valid timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_events: u64,
    pub excluded_events: u64,
    pub distinct_identities: u64,
    pub throttled_events: u64,
    pub distinct_credentials: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub top_identities: Vec<Ranked>,
    pub top_paths: Vec<Ranked>,
    pub top_classifications: Vec<Ranked>,
    pub top_agents: Vec<Ranked>,
    /// Hours with at least one event, ascending.
    pub hourly_counts: Vec<HourlyCount>,
}

/// Result of aggregating a batch.
#[derive(Debug, Clone)]
pub enum Aggregation {
    /// Nothing to report. `excluded` counts records dropped for bad timestamps.
    NoData { excluded: u64 },
    Summary(Box<Summary>),
}

impl Aggregation {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Self::Summary(summary) => Some(summary),
            Self::NoData { .. } => None,
        }
    }
}

/// Frequency counter that ranks by count descending, then key ascending.
#[derive(Debug, Default)]
struct Tally(HashMap<String, u64>);

impl Tally {
    fn add(&mut self, key: Option<&str>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            *self.0.entry(key.to_string()).or_insert(0) += 1;
        }
    }

    fn distinct(&self) -> u64 {
        self.0.len() as u64
    }

    fn top(self, n: usize) -> Vec<Ranked> {
        let mut rows: Vec<Ranked> = self
            .0
            .into_iter()
            .map(|(key, count)| Ranked { key, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        rows.truncate(n);
        rows
    }
}

/// Batch aggregator.
pub struct Aggregator {
    top_n: usize,
    agents: AgentClassifier,
}

impl Aggregator {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            agents: AgentClassifier::new(),
        }
    }

    pub fn aggregate(&self, records: &[RawRecord]) -> Aggregation {
        let mut excluded = 0u64;
        let mut total = 0u64;
        let mut throttled = 0u64;
        let mut first_seen: Option<DateTime<Utc>> = None;
        let mut last_seen: Option<DateTime<Utc>> = None;

        let mut identities = Tally::default();
        let mut paths = Tally::default();
        let mut classifications = Tally::default();
        let mut agents = Tally::default();
        let mut credentials = HashSet::new();
        let mut hourly: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();

        for record in records {
            let Some(ts) = record.parsed_timestamp() else {
                excluded += 1;
                continue;
            };

            total += 1;
            first_seen = Some(first_seen.map_or(ts, |seen| seen.min(ts)));
            last_seen = Some(last_seen.map_or(ts, |seen| seen.max(ts)));
            *hourly.entry(hour_floor(ts)).or_insert(0) += 1;

            identities.add(record.client_identity.as_deref());
            paths.add(record.path.as_deref());
            classifications.add(record.classification.as_deref());
            agents.add(Some(
                self.agents
                    .categorize(record.user_agent.as_deref().unwrap_or_default()),
            ));

            if let Some(digest) = record.credential_digest.as_deref().filter(|d| !d.is_empty()) {
                credentials.insert(digest.to_string());
            }
            if record.outcome.as_deref() == Some(THROTTLED) {
                throttled += 1;
            }
        }

        let (Some(first_seen), Some(last_seen)) = (first_seen, last_seen) else {
            info!(excluded, "No events with a usable timestamp");
            return Aggregation::NoData { excluded };
        };

        info!(total, excluded, "Aggregated events");

        Aggregation::Summary(Box::new(Summary {
            total_events: total,
            excluded_events: excluded,
            distinct_identities: identities.distinct(),
            throttled_events: throttled,
            distinct_credentials: credentials.len() as u64,
            first_seen,
            last_seen,
            top_identities: identities.top(self.top_n),
            top_paths: paths.top(self.top_n),
            top_classifications: classifications.top(self.top_n),
            top_agents: agents.top(self.top_n),
            hourly_counts: hourly
                .into_iter()
                .map(|(hour, count)| HourlyCount { hour, count })
                .collect(),
        }))
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

/// Aggregate with the default table size.
pub fn aggregate(records: &[RawRecord]) -> Aggregation {
    Aggregator::default().aggregate(records)
}

fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(Duration::hours(1)).unwrap_or(ts)
}
