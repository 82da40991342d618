// src/files.rs
//! Source-file enumeration and the per-file text model.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::text::{TextPointer, TextRange};

/// File suffixes handled by the PowerScript engine.
pub const SOURCE_SUFFIXES: [&str; 5] = ["srm", "sru", "srw", "srf", "srs"];

/// One source file to be analyzed: identity plus the line geometry needed
/// to validate engine-reported coordinates.
#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
    line_lengths: Vec<usize>,
}

impl InputFile {
    /// Reads the file at `path` from disk.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let source = std::fs::read_to_string(&path).map_err(|source| {
            crate::error::ScanError::Io {
                source,
                path: path.clone(),
            }
        })?;
        Ok(Self::from_source(path, &source))
    }

    /// Builds the file model from in-memory source text.
    #[must_use]
    pub fn from_source(path: PathBuf, source: &str) -> Self {
        let line_lengths = source.split('\n').map(|l| l.chars().count()).collect();
        Self { path, line_lengths }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display identity of the file, used in logs and error records.
    #[must_use]
    pub fn uri(&self) -> String {
        self.path.display().to_string()
    }

    /// Number of physical lines; always at least one.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_lengths.len()
    }

    /// Character length of a 1-based line. Zero for lines outside the file.
    #[must_use]
    pub fn line_length(&self, line: usize) -> usize {
        self.line_lengths.get(line.wrapping_sub(1)).copied().unwrap_or(0)
    }

    /// The whole-line range for a 1-based line.
    #[must_use]
    pub fn select_line(&self, line: usize) -> TextRange {
        let start = TextPointer::new(line, 0);
        let end = TextPointer::new(line, self.line_length(line));
        TextRange::new(start, end).unwrap_or_else(|_| unreachable!("offset 0 precedes any end"))
    }
}

/// Walks `root` and loads every file with a PowerScript suffix, in path
/// order so a session visits files deterministically.
pub fn enumerate_files(root: &Path) -> Result<Vec<InputFile>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() && has_source_suffix(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match InputFile::from_path(path) {
            Ok(file) => files.push(file),
            Err(e) => tracing::warn!("skipping unreadable source file: {e}"),
        }
    }
    Ok(files)
}

fn has_source_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_SUFFIXES
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}
