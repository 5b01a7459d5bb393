//! Error types for metric computation.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while aggregating or reconciling metric tables.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A trailing window must span at least one month
    #[error("Invalid window length: {months} months")]
    InvalidWindow {
        /// Requested window length
        months: u32,
    },

    /// The reconciled table does not have one row per primary symbol
    #[error("Reconciled table has {actual} rows, expected {expected}")]
    Cardinality {
        /// Distinct symbols in the primary table
        expected: usize,
        /// Rows produced by the join
        actual: usize,
    },
}
