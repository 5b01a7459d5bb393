//! Sector layout stage.

use super::PipelineError;
use crate::config::PipelineConfig;
use rollover::{SectorMap, SectorReport};
use rollover_data::read_reconciled_table;
use rollover_output::{ExportFormat, Exporter, StageSummary};
use tracing::info;

/// The sector table for this run: the external file when given, else the built-in one.
pub(crate) fn sector_map(config: &PipelineConfig) -> Result<SectorMap, PipelineError> {
    Ok(match &config.sector_file {
        Some(path) => SectorMap::from_csv(path)?,
        None => SectorMap::nse_default(),
    })
}

/// Tag reconciled rows with sectors and write the sectioned report.
pub(crate) fn layout(config: &PipelineConfig) -> Result<StageSummary, PipelineError> {
    let rows = read_reconciled_table(&config.reconciled_table)?;
    let sectors = sector_map(config)?;
    let report = SectorReport::build(rows, &sectors);

    let table = report.table();
    table.export_to_file(&config.layout_table, ExportFormat::Csv)?;
    info!(
        sectors = report.sectors(),
        rows = report.rows().len(),
        "wrote sector layout"
    );

    Ok(StageSummary::new("layout")
        .wrote(report.stocks(), &config.layout_table)
        .with_unmapped(report.unmapped()))
}
