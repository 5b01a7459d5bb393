//! Reconciliation stage.

use super::PipelineError;
use crate::config::PipelineConfig;
use rollover_data::{SpotColumn, read_monthly_table, read_six_month_table, read_spot_table};
use rollover_metrics::reconcile;
use rollover_output::{ExportFormat, Exporter, StageSummary, Table};
use tracing::info;

/// Join the metric and spot tables onto the monthly symbols and write the result.
///
/// Every input is loaded and validated before anything is written.
pub(crate) fn merge(config: &PipelineConfig) -> Result<StageSummary, PipelineError> {
    let monthly = read_monthly_table(&config.monthly_table)?;
    let six_month = read_six_month_table(&config.six_month_table)?;
    let current = read_spot_table(&config.spot_current_table, SpotColumn::Current)?;
    let previous = if config.include_previous {
        Some(read_spot_table(
            &config.spot_previous_table,
            SpotColumn::Previous,
        )?)
    } else {
        info!("previous spot table skipped");
        None
    };

    let rows = reconcile(&monthly, &six_month, &current, previous.as_deref())?;
    Table::new(&rows).export_to_file(&config.reconciled_table, ExportFormat::Csv)?;
    Ok(StageSummary::new("merge").wrote(rows.len(), &config.reconciled_table))
}
