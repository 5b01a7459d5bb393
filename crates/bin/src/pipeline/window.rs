//! Monthly and trailing-window metric stages.

use super::PipelineError;
use crate::config::PipelineConfig;
use rollover_data::{SettlementFile, TableSchema, discover_settlement_files, read_settlement_file};
use rollover_metrics::{
    DatedMetric, MetricWindow, MonthlyWindow, TrailingWindow, compute_file_metrics,
};
use rollover_output::{ExportFormat, Exporter, StageSummary, Table};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Metrics of one settlement file, tagged with its trade date.
fn file_metrics(file: &SettlementFile) -> Result<Vec<DatedMetric>, PipelineError> {
    let trade_date = file.require_trade_date()?;
    let observations = read_settlement_file(&file.path, trade_date)?;
    let metrics = compute_file_metrics(&observations)?;
    debug!(
        path = %file.path.display(),
        %trade_date,
        observations = observations.len(),
        symbols = metrics.len(),
        "processed settlement file"
    );
    Ok(metrics
        .into_iter()
        .map(|metric| DatedMetric::new(trade_date, metric))
        .collect())
}

/// Per-file metrics of every settlement file in `dir`.
///
/// Files with a bad name or missing columns are logged, counted and skipped.
pub(crate) fn collect_metrics(
    dir: &Path,
    summary: &mut StageSummary,
) -> Result<Vec<DatedMetric>, PipelineError> {
    let files = discover_settlement_files(dir)?;
    summary.found(files.len());

    let mut metrics = Vec::new();
    for file in &files {
        match file_metrics(file) {
            Ok(rows) => {
                summary.processed();
                metrics.extend(rows);
            }
            Err(PipelineError::Data(e)) if e.is_skippable() => {
                warn!(path = %file.path.display(), error = %e, "skipping settlement file");
                summary.skipped();
            }
            Err(e) => return Err(e),
        }
    }
    Ok(metrics)
}

/// Aggregate the files in `dir` with `window` and write the result to `out`.
fn run_window<W>(
    stage: &str,
    dir: &Path,
    window: &W,
    out: &Path,
) -> Result<StageSummary, PipelineError>
where
    W: MetricWindow,
    W::Row: Serialize + TableSchema,
{
    let mut summary = StageSummary::new(stage);
    let metrics = collect_metrics(dir, &mut summary)?;
    let rows = window.aggregate(&metrics)?;
    Table::new(&rows).export_to_file(out, ExportFormat::Csv)?;
    Ok(summary.wrote(rows.len(), out))
}

/// Latest-month averages.
pub(crate) fn monthly(config: &PipelineConfig) -> Result<StageSummary, PipelineError> {
    run_window(
        "monthly",
        &config.fo_monthly_dir,
        &MonthlyWindow,
        &config.monthly_table,
    )
}

/// Trailing-window averages.
pub(crate) fn six_month(config: &PipelineConfig) -> Result<StageSummary, PipelineError> {
    let window = TrailingWindow::new(config.trailing_months)?;
    run_window(
        "six-month",
        &config.fo_trailing_dir,
        &window,
        &config.six_month_table,
    )
}
