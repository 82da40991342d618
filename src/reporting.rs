// src/reporting.rs
//! Console and JSON rendering of a finished session's records.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;

use crate::session::SessionSummary;
use crate::sink::FileRecords;

/// Prints a per-file breakdown and session totals to stdout.
pub fn print_summary(records: &BTreeMap<PathBuf, FileRecords>, summary: SessionSummary) {
    for (path, file) in records {
        if file.issues.is_empty() && file.errors.is_empty() {
            continue;
        }
        println!("{}", path.display().to_string().bold());
        for issue in &file.issues {
            println!(
                "  {} {} {}",
                issue.range.start().to_string().dimmed(),
                issue.rule_key.yellow(),
                issue.message
            );
        }
        for error in &file.errors {
            println!("  {} {}", "analysis error:".red(), error.message);
        }
    }

    let issues: usize = records.values().map(|r| r.issues.len()).sum();
    let errors: usize = records.values().map(|r| r.errors.len()).sum();
    let totals = format!(
        "{}/{} files analyzed, {issues} issues, {errors} analysis errors",
        summary.processed, summary.total
    );
    if errors > 0 {
        println!("{}", totals.red().bold());
    } else {
        println!("{}", totals.green().bold());
    }
}

/// Serializes all per-file records for machine consumption.
///
/// # Errors
/// Returns the underlying serialization error.
pub fn to_json(records: &BTreeMap<PathBuf, FileRecords>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
