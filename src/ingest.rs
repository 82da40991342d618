// src/ingest.rs
//! Pushes one parsed engine report into the diagnostic sink.
//!
//! Sections ingest independently: a contract violation (bad coordinate,
//! unknown highlight category) abandons the section it occurred in, records
//! one analysis error for the file, and leaves the other sections of the
//! same report untouched. A section either lands completely or not at all.

use thiserror::Error;

use crate::files::InputFile;
use crate::highlight::{normalize_category, UnknownCategoryError};
use crate::report::{
    RawAnalysisError, RawCpdToken, RawHighlighting, RawIssue, RawMetrics, RawReport, RawSymbol,
    RawTextRange,
};
use crate::rules::RULE_PREFIX;
use crate::sink::{
    AnalysisError, DiagnosticSink, DuplicationToken, HighlightSpan, Issue, Metric, Symbol,
};
use crate::text::{map_range, RangeError, TextRange};

/// Engine contract violations caught while ingesting one report section.
#[derive(Debug, Error)]
enum SectionError {
    #[error("RangeError: {0}")]
    Range(#[from] RangeError),

    #[error("UnknownCategoryError: {0}")]
    Category(#[from] UnknownCategoryError),
}

/// Ingests every present section of `report` for `file`.
pub fn ingest_report(sink: &dyn DiagnosticSink, file: &InputFile, report: &RawReport) {
    if let Some(issues) = &report.issues {
        contain(sink, file, ingest_issues(sink, file, issues));
    }
    if let Some(metrics) = &report.metrics {
        ingest_metrics(sink, file, metrics);
    }
    if let Some(lines) = &report.no_sonar_lines {
        sink.save_no_check_lines(file, lines.iter().copied().collect());
    }
    if let Some(symbols) = &report.symbol_table {
        contain(sink, file, ingest_symbols(sink, file, symbols));
    }
    if let Some(errors) = &report.analysis_errors {
        ingest_engine_errors(sink, file, errors);
    }
    if let Some(tokens) = &report.cpd_tokens {
        contain(sink, file, ingest_cpd_tokens(sink, file, tokens));
    }
    if let Some(spans) = &report.highlightings {
        contain(sink, file, ingest_highlights(sink, file, spans));
    }
}

/// Records an orchestration failure (process, parse, contract) as the file's
/// analysis error. The same recording path engine-reported errors use, so
/// both kinds surface identically downstream.
pub fn record_failure(sink: &dyn DiagnosticSink, file: &InputFile, message: String) {
    tracing::error!("{message} while analyzing {}", file.uri());
    sink.save_analysis_error(
        file,
        AnalysisError {
            message,
            detail: None,
        },
    );
}

fn contain(sink: &dyn DiagnosticSink, file: &InputFile, result: Result<(), SectionError>) {
    if let Err(e) = result {
        record_failure(sink, file, e.to_string());
    }
}

fn resolve(file: &InputFile, location: &RawTextRange) -> Result<TextRange, RangeError> {
    let (start, end) = location.pointers();
    map_range(file, start, end)
}

fn ingest_issues(
    sink: &dyn DiagnosticSink,
    file: &InputFile,
    issues: &[RawIssue],
) -> Result<(), SectionError> {
    let mut resolved = Vec::with_capacity(issues.len());
    for issue in issues {
        resolved.push(Issue {
            rule_key: format!("{RULE_PREFIX}{}", issue.rule),
            range: resolve(file, &issue.location)?,
            message: issue.message.clone(),
        });
    }
    for issue in resolved {
        sink.save_issue(file, issue);
    }
    Ok(())
}

fn ingest_metrics(sink: &dyn DiagnosticSink, file: &InputFile, metrics: &RawMetrics) {
    sink.save_metric(file, Metric::Classes, metrics.class_count);
    sink.save_metric(file, Metric::Statements, metrics.statement_count);
    sink.save_metric(file, Metric::Functions, metrics.function_count);
    sink.save_metric(file, Metric::Ncloc, metrics.lines_of_code.len() as u64);
    sink.save_metric(file, Metric::CommentLines, metrics.comment_lines.len() as u64);
    sink.save_metric(file, Metric::Complexity, metrics.cyclomatic_complexity);
    sink.save_metric(
        file,
        Metric::CognitiveComplexity,
        metrics.cognitive_complexity,
    );

    // Line-level fan-out: each line of code feeds per-line accounting.
    for &line in &metrics.lines_of_code {
        sink.save_code_line(file, line);
    }
}

fn ingest_symbols(
    sink: &dyn DiagnosticSink,
    file: &InputFile,
    symbols: &[RawSymbol],
) -> Result<(), SectionError> {
    let mut resolved = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let declaration = resolve(file, &symbol.position)?;
        let references = symbol
            .references
            .iter()
            .map(|r| resolve(file, r))
            .collect::<Result<Vec<_>, _>>()?;
        resolved.push(Symbol {
            declaration,
            references,
        });
    }
    sink.save_symbols(file, resolved);
    Ok(())
}

fn ingest_engine_errors(sink: &dyn DiagnosticSink, file: &InputFile, errors: &[RawAnalysisError]) {
    for error in errors {
        match &error.stack_trace {
            Some(trace) => {
                tracing::error!("analysis error in {}: {}\n{trace}", file.uri(), error.message);
            }
            None => tracing::error!("analysis error in {}: {}", file.uri(), error.message),
        }
        sink.save_analysis_error(
            file,
            AnalysisError {
                message: error.message.clone(),
                detail: error.stack_trace.clone(),
            },
        );
    }
}

fn ingest_cpd_tokens(
    sink: &dyn DiagnosticSink,
    file: &InputFile,
    tokens: &[RawCpdToken],
) -> Result<(), SectionError> {
    let mut resolved = Vec::with_capacity(tokens.len());
    for token in tokens {
        resolved.push(DuplicationToken {
            range: resolve(file, &token.position)?,
            image: token.image.clone(),
        });
    }
    sink.save_cpd_tokens(file, resolved);
    Ok(())
}

fn ingest_highlights(
    sink: &dyn DiagnosticSink,
    file: &InputFile,
    spans: &[RawHighlighting],
) -> Result<(), SectionError> {
    let mut resolved = Vec::with_capacity(spans.len());
    for span in spans {
        resolved.push(HighlightSpan {
            range: resolve(file, &span.position)?,
            category: normalize_category(&span.type_of_text)?,
        });
    }
    sink.save_highlights(file, resolved);
    Ok(())
}
