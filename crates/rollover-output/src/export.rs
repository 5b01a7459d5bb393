//! Export of pipeline tables.
//!
//! Tables are written from `serde` rows. CSV output always starts with the
//! table's header row, even when there are no rows, so that downstream stages
//! can validate the schema of an empty table.

use rollover_data::TableSchema;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format, creating parent directories.
    ///
    /// The content is fully serialized before the file is created, so a failed
    /// export leaves no partial file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Finish a CSV writer into a string.
pub(crate) fn csv_into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// A CSV writer that expects the header row to be written by hand.
pub(crate) fn headerless_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![])
}

/// Rows of one table with their column headers.
#[derive(Debug, Clone, Copy)]
pub struct Table<'a, T> {
    columns: &'static [&'static str],
    rows: &'a [T],
}

impl<'a, T: TableSchema> Table<'a, T> {
    /// Table using the row type's own column layout.
    pub const fn new(rows: &'a [T]) -> Self {
        Self {
            columns: T::COLUMNS,
            rows,
        }
    }
}

impl<'a, T> Table<'a, T> {
    /// Table with explicit column headers, for row types shared by several layouts.
    ///
    /// Rows are serialized positionally, so `columns` must follow field order.
    pub const fn with_columns(columns: &'static [&'static str], rows: &'a [T]) -> Self {
        Self { columns, rows }
    }

    /// Column headers.
    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Serialize> Exporter for Table<'_, T> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = headerless_writer();
                wtr.write_record(self.columns)?;
                for row in self.rows {
                    wtr.serialize(row)?;
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self.rows)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self.rows)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollover_data::{MonthlyMetricRow, SpotColumn, SpotRow};
    use rstest::rstest;

    fn monthly_rows() -> Vec<MonthlyMetricRow> {
        vec![
            MonthlyMetricRow {
                symbol: "ABC".to_string(),
                fut_curr_price: Some(50.0),
                fut_next_price: Some(55.0),
                roll_cost_pct: Some(10.0),
                roll_oi_pct: Some(83.3333),
            },
            MonthlyMetricRow {
                symbol: "XYZ".to_string(),
                fut_curr_price: None,
                fut_next_price: Some(12.5),
                roll_cost_pct: None,
                roll_oi_pct: None,
            },
        ]
    }

    #[test]
    fn test_table_csv_has_header_and_empty_nulls() {
        let rows = monthly_rows();
        let csv = Table::new(&rows).export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "SYMBOL,FUT_CURR_PRICE,FUT_NEXT_PRICE,ROLL_COST_PCT_M,ROLL_OI_PCT_M"
        );
        assert_eq!(lines[1], "ABC,50.0,55.0,10.0,83.3333");
        assert_eq!(lines[2], "XYZ,,12.5,,");
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let rows: Vec<MonthlyMetricRow> = Vec::new();
        let csv = Table::new(&rows).export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(
            csv.trim_end(),
            "SYMBOL,FUT_CURR_PRICE,FUT_NEXT_PRICE,ROLL_COST_PCT_M,ROLL_OI_PCT_M"
        );
    }

    #[test]
    fn test_explicit_columns() {
        let rows = vec![SpotRow {
            trade_date: None,
            symbol: "TCS".to_string(),
            close: Some(3900.0),
        }];
        let csv = Table::with_columns(SpotColumn::Previous.output_columns(), &rows)
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("TRADE_DATE,SYMBOL,PREV_SPOT_CLOSE\n"));
        assert!(csv.contains(",TCS,3900.0"));
    }

    #[test]
    fn test_table_json() {
        let rows = monthly_rows();
        let json = Table::new(&rows).export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"SYMBOL\":\"ABC\""));
        assert!(json.contains("\"ROLL_COST_PCT_M\":null"));
    }

    #[test]
    fn test_export_to_file_creates_directories() {
        let dir = std::env::temp_dir().join(format!("rollover-export-{}", std::process::id()));
        let path = dir.join("nested").join("monthly.csv");
        let rows = monthly_rows();

        Table::new(&rows)
            .export_to_file(&path, ExportFormat::Csv)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ABC"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[rstest]
    #[case(ExportFormat::Csv, "csv")]
    #[case(ExportFormat::Json, "json")]
    #[case(ExportFormat::PrettyJson, "json")]
    fn test_export_format_extension(#[case] format: ExportFormat, #[case] expected: &str) {
        assert_eq!(format.extension(), expected);
    }
}
