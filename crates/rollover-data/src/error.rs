//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while locating or loading input files.
///
/// Value-level parse failures are not errors: they are coerced to `None` by the
/// normalizers. Everything here is structural.
#[derive(Debug, Error)]
pub enum DataError {
    /// Required columns are absent after header normalization
    #[error("{path}: missing required columns {missing:?} (available: {available:?})")]
    MissingColumns {
        /// File that was being read
        path: PathBuf,
        /// Required columns that were not found
        missing: Vec<String>,
        /// Columns the file actually has
        available: Vec<String>,
    },

    /// None of the candidate spellings for a logical column are present
    #[error("{label} not found. Available columns: {available:?}")]
    ColumnNotFound {
        /// Human readable name of the logical column
        label: String,
        /// Columns the table actually has
        available: Vec<String>,
    },

    /// Discovery found no file matching the expected pattern
    #[error("no files matching {pattern} found in {dir}")]
    NoInputFiles {
        /// Directory that was searched
        dir: PathBuf,
        /// Pattern that was expected
        pattern: String,
    },

    /// An upstream output does not exist when a later stage starts
    #[error("expected input file is missing: {path}")]
    MissingInput {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// The filename does not encode a trade date
    #[error("cannot derive a DDMMYYYY trade date from file name: {path}")]
    InvalidFileName {
        /// Offending file
        path: PathBuf,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether the error only invalidates the file being read.
    ///
    /// Settlement files with these errors are skipped and counted; anything else
    /// aborts the stage.
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. } | Self::InvalidFileName { .. }
        )
    }
}
