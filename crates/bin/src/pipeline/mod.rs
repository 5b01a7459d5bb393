//! Pipeline stages.
//!
//! Each stage reads its inputs from the paths in
//! [`PipelineConfig`](crate::config::PipelineConfig), writes exactly one table
//! and returns a [`StageSummary`](rollover_output::StageSummary) for the run report.
//! A stage either completes or fails; nothing is written on failure.

pub(crate) mod layout;
pub(crate) mod merge;
pub(crate) mod spot;
pub(crate) mod window;

use rollover_data::DataError;
use rollover_metrics::MetricsError;
use rollover_output::ExportError;

/// Error type for pipeline stages.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Missing input, unrecognized schema or unreadable file.
    #[error(transparent)]
    Data(#[from] DataError),
    /// Aggregation or reconciliation failure.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Export(#[from] ExportError),
}
