// src/runner.rs
//! Per-file invocation of the external analysis engine.
//!
//! The platform convention merges the engine's stderr into stdout as one
//! interleaved stream. Here the two streams are captured separately and
//! stderr is appended after stdout: a successful engine run leaves stderr
//! empty so the texts coincide, and a run that writes diagnostics to stderr
//! fails report parsing either way, with the diagnostics preserved in the
//! captured text.

use std::process::Command;

use crate::config::Settings;
use crate::error::ScanError;
use crate::files::InputFile;

/// Runs the engine on one file and returns the raw report text.
///
/// Invocation is `launcher artifact-path file-path rules-path`; the engine
/// writes its JSON report to stdout and terminates. Both output streams are
/// drained to completion before the process is reaped, and stderr is folded
/// in after stdout so engine diagnostics survive into the captured text.
///
/// # Errors
/// Any failure to start, read, or wait on the subprocess is returned as
/// [`ScanError::Process`]; the caller records it as an analysis error for
/// this file only and the session continues.
pub fn run_analyzer(
    settings: &Settings,
    file: &InputFile,
    rules_path: &str,
) -> Result<String, ScanError> {
    let output = Command::new(&settings.launcher)
        .arg(&settings.analyzer_path)
        .arg(file.path())
        .arg(rules_path)
        .output()
        .map_err(ScanError::Process)?;

    tracing::debug!("engine exited with {} for {}", output.status, file.uri());

    let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
    raw.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(raw)
}
