//! Error types for color parsing, catalog loading and ranking

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Not exactly six hexadecimal digits after an optional leading `#`
    #[error("invalid color format: {value:?} (expected 6 hex digits)")]
    InvalidColorFormat { value: String },
}

/// Error returned while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error returned by [`rank`](crate::rank::rank).
///
/// Query colors arrive as validated RGB triples, so the only failure left is
/// catalog data that does not hold a valid hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("catalog entry {entry:?} has an unusable color: {source}")]
    InvalidEntryColor {
        /// Display name of the offending entry
        entry: String,
        #[source]
        source: ColorError,
    },
}
