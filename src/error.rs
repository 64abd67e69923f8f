//! Error types surfaced by the save/load subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a save document is rejected before any of it is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("save document is not an object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("{axis} bounds are inverted: start {start} > end {end}")]
    InvertedBounds {
        axis: &'static str,
        start: i64,
        end: i64,
    },
}

/// Errors raised while exporting or importing a map.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("gzip error: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("map file is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid map: {0}")]
    Validation(#[from] ValidationError),

    #[error("{record} record is missing required field `{field}`")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("{record} field `{field}` must be {expected}")]
    InvalidField {
        record: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("symbol {0} has no value source bound")]
    UnboundSymbol(char),
}

impl SaveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SaveError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SaveError>;
