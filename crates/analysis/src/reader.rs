//! Event store reader.
//!
//! Reads the JSON-lines store leniently. Each line is decoded on its own:
//! blank lines are ignored, lines that are not JSON objects are counted and
//! skipped, and individual fields are optional so partial records still
//! contribute what they have.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use snare_core::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, warn};

/// Loosely-typed view of one stored event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub timestamp: Option<String>,
    pub client_identity: Option<String>,
    pub path: Option<String>,
    pub classification: Option<String>,
    pub user_agent: Option<String>,
    pub credential_digest: Option<String>,
    pub outcome: Option<String>,
}

impl RawRecord {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            timestamp: text_field(object, &["timestamp", "ts"]),
            client_identity: text_field(object, &["client_identity", "ip"]),
            path: text_field(object, &["path"]),
            classification: text_field(object, &["classification"]),
            user_agent: text_field(object, &["user_agent"]),
            credential_digest: text_field(object, &["credential_digest", "cred_hash"]),
            outcome: text_field(object, &["outcome"]),
        }
    }

    /// Parsed timestamp, if present and readable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// First string-valued key among `keys`. Nulls and non-strings count as absent.
fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Records read from a store plus the number of lines that were skipped.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub records: Vec<RawRecord>,
    pub malformed_lines: usize,
}

/// Read records from any buffered source.
pub fn read_records<R: BufRead>(mut reader: R) -> Result<ReadOutcome> {
    let mut outcome = ReadOutcome::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        let Ok(text) = std::str::from_utf8(&line) else {
            outcome.malformed_lines += 1;
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => outcome.records.push(RawRecord::from_object(&object)),
            _ => outcome.malformed_lines += 1,
        }
    }

    debug!(
        records = outcome.records.len(),
        malformed = outcome.malformed_lines,
        "Read event store"
    );
    Ok(outcome)
}

/// Read a store file. A missing file reads as an empty store.
pub fn read_file(path: &Path) -> Result<ReadOutcome> {
    match File::open(path) {
        Ok(file) => read_records(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Event store not found");
            Ok(ReadOutcome::default())
        }
        Err(e) => Err(e.into()),
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 instant, or a naive ISO-8601 date-time taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}
