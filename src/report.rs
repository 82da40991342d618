// src/report.rs
//! Wire schema for the engine's per-file JSON report.
//!
//! The report is a single object with optional sections; an absent key means
//! the engine produced nothing for that section, which is not an error.
//! Every section is therefore an `Option`, never an empty default, so
//! ingestion can tell "absent" from "empty".

use serde::Deserialize;

use crate::text::TextPointer;

/// One engine report, as deserialized from the raw subprocess output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawReport {
    pub issues: Option<Vec<RawIssue>>,
    pub metrics: Option<RawMetrics>,
    pub no_sonar_lines: Option<Vec<usize>>,
    pub symbol_table: Option<Vec<RawSymbol>>,
    pub analysis_errors: Option<Vec<RawAnalysisError>>,
    pub cpd_tokens: Option<Vec<RawCpdToken>>,
    pub highlightings: Option<Vec<RawHighlighting>>,
    /// Engine-side wall time in milliseconds, informational only.
    pub analysis_time: Option<u64>,
}

impl RawReport {
    /// One-line section inventory for debug logging.
    #[must_use]
    pub fn summary(&self) -> String {
        fn len<T>(v: &Option<Vec<T>>) -> usize {
            v.as_ref().map_or(0, Vec::len)
        }
        format!(
            "issues: {}, metrics: {}, no-sonar lines: {}, symbols: {}, errors: {}, cpd tokens: {}, highlights: {}, time: {}ms",
            len(&self.issues),
            if self.metrics.is_some() { "yes" } else { "no" },
            len(&self.no_sonar_lines),
            len(&self.symbol_table),
            len(&self.analysis_errors),
            len(&self.cpd_tokens),
            len(&self.highlightings),
            self.analysis_time.unwrap_or(0),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIssue {
    pub rule: String,
    pub location: RawTextRange,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTextRange {
    pub start: RawTextPointer,
    pub end: RawTextPointer,
}

impl RawTextRange {
    /// The engine coordinates as platform pointers, not yet validated
    /// against the file.
    #[must_use]
    pub fn pointers(&self) -> (TextPointer, TextPointer) {
        (
            TextPointer::new(self.start.line, self.start.line_offset),
            TextPointer::new(self.end.line, self.end.line_offset),
        )
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTextPointer {
    pub line: usize,
    pub line_offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMetrics {
    pub class_count: u64,
    pub statement_count: u64,
    pub function_count: u64,
    pub lines_of_code: Vec<usize>,
    pub comment_lines: Vec<usize>,
    pub cyclomatic_complexity: u64,
    pub cognitive_complexity: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSymbol {
    pub position: RawTextRange,
    #[serde(default)]
    pub references: Vec<RawTextRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAnalysisError {
    pub message: String,
    pub stack_trace: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCpdToken {
    pub position: RawTextRange,
    /// Normalized token text used for cross-file duplicate detection.
    pub image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawHighlighting {
    pub position: RawTextRange,
    pub type_of_text: String,
}

/// Deserializes one file's raw report text.
///
/// # Errors
/// Returns the underlying `serde_json` error when the text is structurally
/// invalid or fails schema coercion; the caller records it as an analysis
/// error for the file.
pub fn parse_report(raw: &str) -> Result<RawReport, serde_json::Error> {
    serde_json::from_str(raw)
}
