//! Report writer.
//!
//! Writes the ranked tables and hourly series as CSV plus a Markdown
//! narrative into an output directory.

use snare_core::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregate::{Ranked, Summary};

pub const TOP_IDENTITIES_FILE: &str = "top_identities.csv";
pub const TOP_PATHS_FILE: &str = "top_paths.csv";
pub const TOP_CLASSIFICATIONS_FILE: &str = "top_classifications.csv";
pub const TOP_AGENTS_FILE: &str = "top_agents.csv";
pub const HOURLY_COUNTS_FILE: &str = "hourly_counts.csv";
pub const SUMMARY_FILE: &str = "summary.md";

/// Quote a CSV field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn ranked_csv(header: &str, rows: &[Ranked]) -> String {
    let mut out = format!("{},count\n", header);
    for row in rows {
        let _ = writeln!(out, "{},{}", csv_field(&row.key), row.count);
    }
    out
}

fn hourly_csv(summary: &Summary) -> String {
    let mut out = String::from("hour,count\n");
    for row in &summary.hourly_counts {
        let _ = writeln!(out, "{},{}", row.hour.format("%Y-%m-%dT%H:00:00Z"), row.count);
    }
    out
}

/// Backticks and line breaks would break the Markdown list item.
fn md_code(value: &str) -> String {
    format!("`{}`", value.replace('`', "'").replace(['\n', '\r'], " "))
}

fn ranked_section(out: &mut String, title: &str, rows: &[Ranked]) {
    let _ = writeln!(out, "\n## {}\n", title);
    if rows.is_empty() {
        out.push_str("- (none)\n");
    }
    for row in rows {
        let _ = writeln!(out, "- {}: {}", md_code(&row.key), row.count);
    }
}

/// Markdown narrative for a summary.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::from("# Snare Summary Report\n\n");
    let _ = writeln!(out, "- Total events: **{}**", summary.total_events);
    let _ = writeln!(out, "- Distinct identities: **{}**", summary.distinct_identities);
    let _ = writeln!(out, "- Throttled events: **{}**", summary.throttled_events);
    let _ = writeln!(out, "- Distinct credential pairs: **{}**", summary.distinct_credentials);
    let _ = writeln!(
        out,
        "- Time range (UTC): **{} to {}**",
        summary.first_seen.format("%Y-%m-%d %H:%M:%S"),
        summary.last_seen.format("%Y-%m-%d %H:%M:%S")
    );
    if summary.excluded_events > 0 {
        let _ = writeln!(
            out,
            "- Excluded: **{}** events with a missing or unreadable timestamp are not counted above",
            summary.excluded_events
        );
    }

    ranked_section(&mut out, "Top Classifications", &summary.top_classifications);
    ranked_section(&mut out, "Top Paths", &summary.top_paths);
    ranked_section(&mut out, "Top Identities", &summary.top_identities);
    ranked_section(&mut out, "Client Categories", &summary.top_agents);

    let _ = writeln!(out, "\n## Hourly Activity\n");
    for row in &summary.hourly_counts {
        let _ = writeln!(out, "- {}: {}", row.hour.format("%Y-%m-%d %H:00"), row.count);
    }
    out
}

/// Write every report file into `out_dir`, creating it if needed.
/// Returns the written paths.
pub fn write_report(summary: &Summary, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let files = [
        (TOP_IDENTITIES_FILE, ranked_csv("identity", &summary.top_identities)),
        (TOP_PATHS_FILE, ranked_csv("path", &summary.top_paths)),
        (
            TOP_CLASSIFICATIONS_FILE,
            ranked_csv("classification", &summary.top_classifications),
        ),
        (TOP_AGENTS_FILE, ranked_csv("agent_category", &summary.top_agents)),
        (HOURLY_COUNTS_FILE, hourly_csv(summary)),
        (SUMMARY_FILE, render_summary(summary)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = out_dir.join(name);
        fs::write(&path, contents)?;
        written.push(path);
    }

    info!(dir = %out_dir.display(), files = written.len(), "Report written");
    Ok(written)
}
