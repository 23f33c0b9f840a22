//! Offline analysis of the snare event store.
//!
//! [`reader`] loads the JSON-lines store, [`aggregate`] folds it into ranked
//! tables and an hourly series, and [`report`] writes CSV and Markdown.

pub mod aggregate;
pub mod enrich;
pub mod reader;
pub mod report;

pub use aggregate::{aggregate, Aggregation, Aggregator, HourlyCount, Ranked, Summary};
pub use enrich::AgentClassifier;
pub use reader::{parse_timestamp, read_file, read_records, RawRecord, ReadOutcome};
pub use report::write_report;
