// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while driving an analysis session.
///
/// Per-file failures (`Process`, `Parse`) never abort the session; the
/// driver converts them into analysis-error records for the file and moves
/// on. `Io` is reserved for faults outside the per-file pipeline, such as
/// file enumeration.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("IoError: {0}")]
    Process(std::io::Error),

    #[error("ParseError: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

// Allow `?` on std::io::Error by converting to ScanError::Io with unknown path.
impl From<std::io::Error> for ScanError {
    fn from(source: std::io::Error) -> Self {
        ScanError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(e: walkdir::Error) -> Self {
        let path = e
            .path()
            .map_or_else(|| PathBuf::from("<unknown>"), PathBuf::from);
        match e.into_io_error() {
            Some(source) => ScanError::Io { source, path },
            None => ScanError::Config("file walk cycle detected".to_string()),
        }
    }
}
