//! Cash-market spot stage.

use super::PipelineError;
use crate::config::{Period, PipelineConfig};
use rollover_data::{SpotRow, discover_cash_market_file, read_cash_market_file};
use rollover_output::{ExportFormat, Exporter, StageSummary, Table};
use tracing::debug;

/// Extract EQ closes for `period` and write its spot table.
pub(crate) fn spot(config: &PipelineConfig, period: Period) -> Result<StageSummary, PipelineError> {
    let mut summary = StageSummary::new(period.label());
    let path = discover_cash_market_file(config.cash_market_dir(period))?;
    summary.found(1);

    let rows: Vec<SpotRow> = read_cash_market_file(&path)?
        .into_iter()
        .map(|quote| SpotRow {
            trade_date: quote.as_of,
            symbol: quote.symbol,
            close: quote.close_price,
        })
        .collect();
    summary.processed();
    debug!(path = %path.display(), rows = rows.len(), "read cash-market file");

    let out = config.spot_table(period);
    Table::with_columns(period.column().output_columns(), &rows)
        .export_to_file(out, ExportFormat::Csv)?;
    Ok(summary.wrote(rows.len(), out))
}
