//! Bridge between the out-of-process PowerScript analyzer and a
//! code-quality reporting platform.
//!
//! One analysis session exports the active-rule configuration to a transfer
//! file, then runs the engine once per source file. Each engine run emits a
//! multi-section JSON report (issues, metrics, symbols, duplication tokens,
//! highlighting, analysis errors) which is parsed, reconciled against the
//! file's text-range model, and pushed into a [`sink::DiagnosticSink`].

pub mod config;
pub mod error;
pub mod files;
pub mod highlight;
pub mod ingest;
pub mod report;
pub mod reporting;
pub mod rules;
pub mod runner;
pub mod session;
pub mod sink;
pub mod text;
