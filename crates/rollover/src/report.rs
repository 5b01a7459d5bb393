//! Sector report: reconciled rows tagged with a sector and laid out in
//! sector blocks separated by blank rows.

use crate::sector::{SectorClassifier, UNMAPPED, canonical_symbol};
use rollover_data::{ReconciledRow, TableSchema};
use rollover_output::{LayoutRow, SectionedTable, sectioned};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// One reconciled symbol with its sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReportRow {
    /// Sector name.
    #[serde(rename = "SECTOR")]
    pub sector: String,

    /// Canonical symbol.
    #[serde(rename = "SYMBOL")]
    pub symbol: String,

    /// Current period spot close.
    #[serde(rename = "SPOT_CLOSE")]
    pub spot_close: Option<f64>,

    /// Previous period spot close.
    #[serde(rename = "PREV_SPOT_CLOSE")]
    pub prev_spot_close: Option<f64>,

    /// Mean next-contract price over the month.
    #[serde(rename = "FUT_NEXT_PRICE")]
    pub fut_next_price: Option<f64>,

    /// Monthly roll cost %.
    #[serde(rename = "ROLL_COST_PCT_M")]
    pub roll_cost_pct_m: Option<f64>,

    /// Monthly roll OI %.
    #[serde(rename = "ROLL_OI_PCT_M")]
    pub roll_oi_pct_m: Option<f64>,

    /// Trailing-window roll OI %.
    #[serde(rename = "ROLL_OI_PCT_6M")]
    pub roll_oi_pct_6m: Option<f64>,

    /// Trailing-window roll cost %.
    #[serde(rename = "ROLL_COST_PCT_6M")]
    pub roll_cost_pct_6m: Option<f64>,
}

impl SectorReportRow {
    /// Tag a reconciled row, resolving legacy symbol aliases first.
    pub fn classify(row: ReconciledRow, classifier: &impl SectorClassifier) -> Self {
        let symbol = canonical_symbol(&row.symbol);
        let sector = classifier.classify(&symbol).to_string();
        Self {
            sector,
            symbol,
            spot_close: row.spot_close,
            prev_spot_close: row.prev_spot_close,
            fut_next_price: row.fut_next_price,
            roll_cost_pct_m: row.roll_cost_pct_m,
            roll_oi_pct_m: row.roll_oi_pct_m,
            roll_oi_pct_6m: row.roll_oi_pct_6m,
            roll_cost_pct_6m: row.roll_cost_pct_6m,
        }
    }

    /// Whether no sector was found for the symbol.
    pub fn is_unmapped(&self) -> bool {
        self.sector == UNMAPPED
    }
}

impl TableSchema for SectorReportRow {
    const COLUMNS: &'static [&'static str] = &[
        "SECTOR",
        "SYMBOL",
        "SPOT_CLOSE",
        "PREV_SPOT_CLOSE",
        "FUT_NEXT_PRICE",
        "ROLL_COST_PCT_M",
        "ROLL_OI_PCT_M",
        "ROLL_OI_PCT_6M",
        "ROLL_COST_PCT_6M",
    ];
}

/// The laid-out sector report with its audit counts.
#[derive(Debug, Clone)]
pub struct SectorReport {
    rows: Vec<LayoutRow<SectorReportRow>>,
    sectors: usize,
    stocks: usize,
    unmapped: usize,
}

impl SectorReport {
    /// Classify `rows` and lay them out by `(SECTOR, SYMBOL)`.
    pub fn build(rows: Vec<ReconciledRow>, classifier: &impl SectorClassifier) -> Self {
        let tagged: Vec<_> = rows
            .into_iter()
            .map(|row| SectorReportRow::classify(row, classifier))
            .collect();

        let sectors = tagged
            .iter()
            .map(|r| r.sector.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let stocks = tagged
            .iter()
            .map(|r| r.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let unmapped = tagged.iter().filter(|r| r.is_unmapped()).count();

        let rows = sectioned(tagged, |r| r.sector.clone(), |r| r.symbol.clone());
        info!(sectors, stocks, unmapped, "built sector report");

        Self {
            rows,
            sectors,
            stocks,
            unmapped,
        }
    }

    /// Laid-out rows, separators included.
    pub fn rows(&self) -> &[LayoutRow<SectorReportRow>] {
        &self.rows
    }

    /// Distinct sectors.
    pub const fn sectors(&self) -> usize {
        self.sectors
    }

    /// Distinct symbols.
    pub const fn stocks(&self) -> usize {
        self.stocks
    }

    /// Rows tagged [`UNMAPPED`].
    pub const fn unmapped(&self) -> usize {
        self.unmapped
    }

    /// Exportable view with the report headers.
    pub fn table(&self) -> SectionedTable<'_, SectorReportRow> {
        SectionedTable::new(SectorReportRow::COLUMNS, &self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::SectorMap;
    use rollover_output::{ExportFormat, Exporter};

    fn reconciled(symbol: &str, oi: Option<f64>) -> ReconciledRow {
        ReconciledRow {
            symbol: symbol.to_string(),
            spot_close: Some(100.0),
            prev_spot_close: None,
            fut_next_price: Some(101.0),
            roll_cost_pct_m: Some(1.0),
            roll_oi_pct_m: oi,
            roll_oi_pct_6m: None,
            roll_cost_pct_6m: None,
        }
    }

    fn report() -> SectorReport {
        SectorReport::build(
            vec![
                reconciled("TCS", Some(80.0)),
                reconciled("SBIN", Some(70.0)),
                reconciled("FOOBAR", None),
                reconciled("INFY", Some(75.0)),
                reconciled("LTI", Some(60.0)),
            ],
            &SectorMap::nse_default(),
        )
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.sectors(), 3);
        assert_eq!(report.stocks(), 5);
        assert_eq!(report.unmapped(), 1);
        assert_eq!(report.rows().len(), 5 + 3);
    }

    #[test]
    fn test_order_and_separators() {
        let report = report();
        let keys: Vec<_> = report
            .rows()
            .iter()
            .map(|r| {
                r.record()
                    .map_or_else(String::new, |r| format!("{}:{}", r.sector, r.symbol))
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                "BANKING:SBIN",
                "",
                "IT:INFY",
                "IT:LTIM",
                "IT:TCS",
                "",
                "UNMAPPED:FOOBAR",
                "",
            ]
        );
    }

    #[test]
    fn test_csv_layout() {
        let report = report();
        let csv = report.table().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "SECTOR,SYMBOL,SPOT_CLOSE,PREV_SPOT_CLOSE,FUT_NEXT_PRICE,ROLL_COST_PCT_M,ROLL_OI_PCT_M,ROLL_OI_PCT_6M,ROLL_COST_PCT_6M"
        );
        assert_eq!(lines[1], "BANKING,SBIN,100.0,,101.0,1.0,70.0,,");
        assert_eq!(lines[2], ",,,,,,,,");
        assert_eq!(lines.len(), 1 + 8);
    }

    #[test]
    fn test_empty_report() {
        let report = SectorReport::build(Vec::new(), &SectorMap::nse_default());
        assert_eq!(report.sectors(), 0);
        assert!(report.rows().is_empty());
        let csv = report.table().export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
