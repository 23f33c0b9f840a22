//! Offline report over the snare event log.
//!
//! Reads the JSON-lines store, aggregates it, and writes CSV tables plus a
//! Markdown summary. An empty or unusable log is reported and exits cleanly.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use analysis::{read_file, Aggregation, Aggregator};
use snare_core::limits::DEFAULT_TOP_N;
use telemetry::init_tracing_from_env;

#[derive(Parser, Debug)]
#[command(name = "snare-report")]
#[command(about = "Summarize events captured by the snare deception endpoint")]
struct Args {
    /// Event log to read
    #[arg(long, default_value = "logs/events.jsonl", env = "SNARE_LOG_FILE")]
    log_file: PathBuf,

    /// Directory for the CSV tables and summary.md
    #[arg(long, default_value = "reports", env = "SNARE_REPORT_DIR")]
    out_dir: PathBuf,

    /// Rows kept in each ranked table
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Also print the summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing_from_env();

    let args = Args::parse();

    let outcome = read_file(&args.log_file)
        .with_context(|| format!("Failed to read {}", args.log_file.display()))?;
    if outcome.malformed_lines > 0 {
        info!(skipped = outcome.malformed_lines, "Skipped malformed lines");
    }

    let summary = match Aggregator::new(args.top).aggregate(&outcome.records) {
        Aggregation::NoData { excluded } => {
            println!("No events found in {}", args.log_file.display());
            if excluded > 0 {
                println!("({} records had no usable timestamp)", excluded);
            }
            return Ok(());
        }
        Aggregation::Summary(summary) => summary,
    };

    let written = analysis::write_report(&summary, &args.out_dir)
        .with_context(|| format!("Failed to write report to {}", args.out_dir.display()))?;
    for path in &written {
        println!("Saved: {}", path.display());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{}", json);
    }

    Ok(())
}
