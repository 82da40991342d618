// src/sink.rs
//! Platform-side diagnostic sink and the typed records this system emits.
//!
//! The sink mirrors the reporting platform's per-file collectors. All writes
//! are fire-and-forget: nothing here reads results back. Implementations
//! must tolerate concurrent writers so sessions can run files in parallel.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::files::InputFile;
use crate::highlight::HighlightCategory;
use crate::text::TextRange;

/// Per-file metrics the engine reports as scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    Classes,
    Statements,
    Functions,
    Ncloc,
    CommentLines,
    Complexity,
    CognitiveComplexity,
}

impl Metric {
    /// The platform's key for this metric.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Statements => "statements",
            Self::Functions => "functions",
            Self::Ncloc => "ncloc",
            Self::CommentLines => "comment_lines",
            Self::Complexity => "complexity",
            Self::CognitiveComplexity => "cognitive_complexity",
        }
    }
}

/// One rule violation at one location.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// Full rule key, prefix included (`PBEmptyCatch`).
    pub rule_key: String,
    pub range: TextRange,
    pub message: String,
}

/// A symbol declaration with its ordered reference positions.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub declaration: TextRange,
    pub references: Vec<TextRange>,
}

/// One lexical token of the duplication-detection stream.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicationToken {
    pub range: TextRange,
    pub image: String,
}

/// One span of the syntax-highlighting stream.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightSpan {
    pub range: TextRange,
    pub category: HighlightCategory,
}

/// A failure attributed to one file: engine-reported, or a process, parse,
/// or coordinate contract failure detected by the orchestration.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisError {
    pub message: String,
    pub detail: Option<String>,
}

/// Destination for everything one session produces.
pub trait DiagnosticSink: Send + Sync {
    fn save_issue(&self, file: &InputFile, issue: Issue);
    fn save_metric(&self, file: &InputFile, metric: Metric, value: u64);
    /// Marks one line as containing code, for line-level accounting.
    fn save_code_line(&self, file: &InputFile, line: usize);
    /// Registers lines whose diagnostics must be suppressed.
    fn save_no_check_lines(&self, file: &InputFile, lines: BTreeSet<usize>);
    fn save_symbols(&self, file: &InputFile, symbols: Vec<Symbol>);
    fn save_cpd_tokens(&self, file: &InputFile, tokens: Vec<DuplicationToken>);
    fn save_highlights(&self, file: &InputFile, spans: Vec<HighlightSpan>);
    fn save_analysis_error(&self, file: &InputFile, error: AnalysisError);
}

/// Everything collected for a single file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileRecords {
    pub issues: Vec<Issue>,
    pub metrics: BTreeMap<&'static str, u64>,
    pub code_lines: Vec<usize>,
    pub no_check_lines: BTreeSet<usize>,
    pub symbols: Vec<Symbol>,
    pub cpd_tokens: Vec<DuplicationToken>,
    pub highlights: Vec<HighlightSpan>,
    pub errors: Vec<AnalysisError>,
}

/// In-memory sink used by the CLI and the test suites.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<BTreeMap<PathBuf, FileRecords>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_file<F: FnOnce(&mut FileRecords)>(&self, file: &InputFile, f: F) {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(records.entry(file.path().to_path_buf()).or_default());
    }

    /// Snapshot of everything recorded so far, keyed by file path.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<PathBuf, FileRecords> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Records for one file; default-empty if nothing was saved for it.
    #[must_use]
    pub fn file_records(&self, file: &InputFile) -> FileRecords {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(file.path())
            .cloned()
            .unwrap_or_default()
    }
}

impl DiagnosticSink for MemorySink {
    fn save_issue(&self, file: &InputFile, issue: Issue) {
        self.with_file(file, |r| r.issues.push(issue));
    }

    fn save_metric(&self, file: &InputFile, metric: Metric, value: u64) {
        self.with_file(file, |r| {
            r.metrics.insert(metric.key(), value);
        });
    }

    fn save_code_line(&self, file: &InputFile, line: usize) {
        self.with_file(file, |r| r.code_lines.push(line));
    }

    fn save_no_check_lines(&self, file: &InputFile, lines: BTreeSet<usize>) {
        self.with_file(file, |r| r.no_check_lines.extend(lines));
    }

    fn save_symbols(&self, file: &InputFile, symbols: Vec<Symbol>) {
        self.with_file(file, |r| r.symbols.extend(symbols));
    }

    fn save_cpd_tokens(&self, file: &InputFile, tokens: Vec<DuplicationToken>) {
        self.with_file(file, |r| r.cpd_tokens.extend(tokens));
    }

    fn save_highlights(&self, file: &InputFile, spans: Vec<HighlightSpan>) {
        self.with_file(file, |r| r.highlights.extend(spans));
    }

    fn save_analysis_error(&self, file: &InputFile, error: AnalysisError) {
        self.with_file(file, |r| r.errors.push(error));
    }
}
