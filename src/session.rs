// src/session.rs
//! Drives one analysis session: rule export, then Runner → Parser →
//! Ingestor per file.
//!
//! The reference mode (`jobs == 1`) runs files strictly one at a time, so at
//! most one engine subprocess is resident and results land in file order.
//! With `jobs > 1` files fan out over a bounded rayon pool: the rule
//! artifact is written before any worker starts, sink implementations are
//! thread-safe, and cancellation still takes effect only between files.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::config::Settings;
use crate::error::ScanError;
use crate::files::InputFile;
use crate::ingest::{ingest_report, record_failure};
use crate::report::parse_report;
use crate::rules::{export_active_rules, ActiveRuleRegistry};
use crate::runner::run_analyzer;
use crate::sink::DiagnosticSink;

/// Minimum spacing between coarse progress lines.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Poll-style cancellation collaborator. Checked once per completed file,
/// never mid-file: a file already handed to the engine always finishes.
pub trait CancellationSource: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// A run that never gets cancelled.
pub struct NeverCancelled;

impl CancellationSource for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancellationSource for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// How far the session got. Cancellation is not a rollback: processed files
/// keep their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub processed: usize,
    pub total: usize,
}

/// One analysis session over a fixed file set.
pub struct Session<'a> {
    settings: &'a Settings,
    sink: &'a dyn DiagnosticSink,
    cancel: &'a dyn CancellationSource,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(
        settings: &'a Settings,
        sink: &'a dyn DiagnosticSink,
        cancel: &'a dyn CancellationSource,
    ) -> Self {
        Self {
            settings,
            sink,
            cancel,
        }
    }

    /// Exports the active rules once, then runs the per-file pipeline over
    /// `files`. Per-file failures are recorded and never abort the session.
    pub fn run(
        &self,
        files: &[InputFile],
        registry: &dyn ActiveRuleRegistry,
    ) -> SessionSummary {
        let rules_path = export_active_rules(registry);
        let total = files.len();
        tracing::info!("{total} total source files to be analyzed");

        let progress = Progress::new(total);
        let processed = if self.settings.jobs > 1 {
            self.run_parallel(files, &rules_path, &progress)
        } else {
            self.run_sequential(files, &rules_path, &progress)
        };
        progress.finish(processed);

        SessionSummary { processed, total }
    }

    fn run_sequential(&self, files: &[InputFile], rules_path: &str, progress: &Progress) -> usize {
        let mut processed = 0;
        for file in files {
            progress.tick(processed);
            self.process_file(file, rules_path);
            processed += 1;
            if self.cancel.is_cancelled() {
                break;
            }
        }
        processed
    }

    fn run_parallel(&self, files: &[InputFile], rules_path: &str, progress: &Progress) -> usize {
        let processed = AtomicUsize::new(0);
        let work = || {
            files.par_iter().for_each(|file| {
                if self.cancel.is_cancelled() {
                    return;
                }
                self.process_file(file, rules_path);
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.tick(done);
            });
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                tracing::warn!(
                    "could not build a {}-thread worker pool ({e}); \
                     running on the global pool with {} threads",
                    self.settings.jobs,
                    rayon::current_num_threads()
                );
                work();
            }
        }
        processed.load(Ordering::SeqCst)
    }

    /// Runner → Parser → Ingestor for one file. Every failure path ends in
    /// an analysis-error record for this file.
    fn process_file(&self, file: &InputFile, rules_path: &str) {
        tracing::debug!("analyzing {}", file.uri());
        let raw = match run_analyzer(self.settings, file, rules_path) {
            Ok(raw) => raw,
            Err(e) => {
                record_failure(self.sink, file, e.to_string());
                return;
            }
        };
        match parse_report(&raw) {
            Ok(report) => {
                tracing::debug!("{}", report.summary());
                ingest_report(self.sink, file, &report);
            }
            Err(e) => record_failure(self.sink, file, ScanError::Parse(e).to_string()),
        }
    }
}

/// Rate-limited progress reporting; the final line is unconditional.
struct Progress {
    total: usize,
    last_emit: Mutex<Instant>,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            last_emit: Mutex::new(Instant::now()),
        }
    }

    fn tick(&self, done: usize) {
        let mut last = self
            .last_emit
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if last.elapsed() >= PROGRESS_INTERVAL {
            *last = Instant::now();
            tracing::info!("{done}/{} files analyzed", self.total);
        }
    }

    fn finish(&self, done: usize) {
        tracing::info!("{done}/{} files analyzed", self.total);
    }
}
