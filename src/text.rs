// src/text.rs
//! Text coordinates and the engine-to-platform position mapper.
//!
//! The engine reports (line, offset) pairs with 1-based lines and 0-based
//! offsets within the line. Ranges on the last line whose offset delta is at
//! most one are an end-of-file marker: the engine uses them for diagnostics
//! that conceptually apply past the last character, and the literal offsets
//! carry no meaningful width.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::files::InputFile;

/// A cursor position within a file. Lines are 1-based, offsets 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TextPointer {
    pub line: usize,
    pub offset: usize,
}

impl TextPointer {
    #[must_use]
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for TextPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

/// A span between two pointers, `start <= end` in (line, offset) order.
/// Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    start: TextPointer,
    end: TextPointer,
}

impl TextRange {
    /// Builds a range, rejecting inverted pointer pairs.
    pub fn new(start: TextPointer, end: TextPointer) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> TextPointer {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> TextPointer {
        self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A coordinate the engine reported outside the file's physical bounds.
///
/// The mapper never clamps: an out-of-bounds coordinate is a contract
/// violation by the engine and must surface as an analysis error for the
/// file instead of silently shifting a diagnostic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("line {line} is outside the file (last line is {last_line})")]
    LineOutOfBounds { line: usize, last_line: usize },

    #[error("offset {offset} on line {line} exceeds the line length {line_length}")]
    OffsetOutOfBounds {
        line: usize,
        offset: usize,
        line_length: usize,
    },

    #[error("range start {start} is after its end {end}")]
    Inverted { start: TextPointer, end: TextPointer },
}

/// Maps an engine-reported range onto the file's text-range model.
///
/// End-of-file sentinel: when both pointers sit on the last line and the
/// offset delta is at most one, the whole last line is selected and the
/// literal offsets are ignored.
pub fn map_range(
    file: &InputFile,
    start: TextPointer,
    end: TextPointer,
) -> Result<TextRange, RangeError> {
    if is_eof_sentinel(file, start, end) {
        return Ok(file.select_line(file.line_count()));
    }
    validate_pointer(file, start)?;
    validate_pointer(file, end)?;
    TextRange::new(start, end)
}

fn is_eof_sentinel(file: &InputFile, start: TextPointer, end: TextPointer) -> bool {
    let last_line = file.line_count();
    if start.line != last_line || end.line != last_line {
        return false;
    }
    // The delta may be negative; only a width above one disqualifies.
    end.offset as i64 - start.offset as i64 <= 1
}

fn validate_pointer(file: &InputFile, pointer: TextPointer) -> Result<(), RangeError> {
    let last_line = file.line_count();
    if pointer.line < 1 || pointer.line > last_line {
        return Err(RangeError::LineOutOfBounds {
            line: pointer.line,
            last_line,
        });
    }
    let line_length = file.line_length(pointer.line);
    if pointer.offset > line_length {
        return Err(RangeError::OffsetOutOfBounds {
            line: pointer.line,
            offset: pointer.offset,
            line_length,
        });
    }
    Ok(())
}
