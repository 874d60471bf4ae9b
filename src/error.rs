//! Error type shared by the library.
//!
//! Absence of a match (no breakpoint, no valid indent, no injection point) is
//! never an error; those cases are reported through `Option` or
//! [`crate::Outcome::Unchanged`].

use std::path::PathBuf;

/// Failures surfaced by buffer edits, settings loading and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("row {row} is out of range (buffer has {count} lines)")]
    RowOutOfRange { row: usize, count: usize },

    #[error("edits overlap at offset {0}")]
    OverlappingEdits(usize),

    #[error("edit at offset {offset} falls outside the buffer ({len} bytes)")]
    EditOutOfBounds { offset: usize, len: usize },

    #[error("failed to read settings from {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    SettingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
