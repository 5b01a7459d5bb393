//! Intermediate tables exchanged between pipeline stages.
//!
//! Each stage writes one flat table and later stages read it back. The row
//! types here carry the column layout ([`TableSchema`]) and the loaders
//! validate it, so a stage never guesses its way through an unexpected schema.

use crate::error::{DataError, Result};
use crate::normalize::{
    column_names, missing_columns, normalize_symbol, parse_day_first, parse_number,
    read_text_frame, resolve_column, text_values,
};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed, ordered column layout of a table row type.
pub trait TableSchema {
    /// Column headers in output order.
    const COLUMNS: &'static [&'static str];
}

/// Monthly rollover metrics, one row per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetricRow {
    /// Symbol.
    #[serde(rename = "SYMBOL")]
    pub symbol: String,

    /// Mean near-contract price over the month.
    #[serde(rename = "FUT_CURR_PRICE")]
    pub fut_curr_price: Option<f64>,

    /// Mean next-contract price over the month.
    #[serde(rename = "FUT_NEXT_PRICE")]
    pub fut_next_price: Option<f64>,

    /// Mean roll cost % over the month.
    #[serde(rename = "ROLL_COST_PCT_M")]
    pub roll_cost_pct: Option<f64>,

    /// Mean roll OI % over the month.
    #[serde(rename = "ROLL_OI_PCT_M")]
    pub roll_oi_pct: Option<f64>,
}

impl TableSchema for MonthlyMetricRow {
    const COLUMNS: &'static [&'static str] = &[
        "SYMBOL",
        "FUT_CURR_PRICE",
        "FUT_NEXT_PRICE",
        "ROLL_COST_PCT_M",
        "ROLL_OI_PCT_M",
    ];
}

/// Trailing-window rollover metrics, one row per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SixMonthMetricRow {
    /// Symbol.
    #[serde(rename = "SYMBOL")]
    pub symbol: String,

    /// Mean roll OI % over the trailing window.
    #[serde(rename = "ROLL_OI_PCT_6M")]
    pub roll_oi_pct: Option<f64>,

    /// Mean roll cost % over the trailing window.
    #[serde(rename = "ROLL_COST_PCT_6M")]
    pub roll_cost_pct: Option<f64>,
}

impl TableSchema for SixMonthMetricRow {
    const COLUMNS: &'static [&'static str] = &["SYMBOL", "ROLL_OI_PCT_6M", "ROLL_COST_PCT_6M"];
}

/// Which spot snapshot a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotColumn {
    /// Latest period close.
    Current,

    /// Previous period close.
    Previous,
}

impl SpotColumn {
    /// Accepted header spellings for the close column, in priority order.
    pub const fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Current => &["SPOT_CLOSE", "CLOSE", "CLOSE_PRICE", "LAST"],
            Self::Previous => &["PREV_SPOT_CLOSE", "PRE_SPOT_CLOSE", "pre_SPOT_CLOSE", "CLOSE"],
        }
    }

    /// Human readable name used in schema errors.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current spot close",
            Self::Previous => "Previous spot close",
        }
    }

    /// Column layout written by the spot stage for this snapshot.
    pub const fn output_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Current => &["TRADE_DATE", "SYMBOL", "SPOT_CLOSE"],
            Self::Previous => &["TRADE_DATE", "SYMBOL", "PREV_SPOT_CLOSE"],
        }
    }
}

/// One spot close as written by the spot stage.
///
/// The close column header depends on the snapshot; see [`SpotColumn::output_columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRow {
    /// Trade date of the snapshot.
    pub trade_date: Option<NaiveDate>,

    /// Symbol.
    pub symbol: String,

    /// Close price.
    pub close: Option<f64>,
}

impl TableSchema for SpotRow {
    const COLUMNS: &'static [&'static str] = SpotColumn::Current.output_columns();
}

/// Final per-symbol record after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    /// Symbol.
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

impl TableSchema for ReconciledRow {
    const COLUMNS: &'static [&'static str] = &[
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

impl ReconciledRow {
    /// Metric values in column order, after `SYMBOL`.
    pub const fn values(&self) -> [Option<f64>; 7] {
        [
            self.spot_close,
            self.prev_spot_close,
            self.fut_next_price,
            self.roll_cost_pct_m,
            self.roll_oi_pct_m,
            self.roll_oi_pct_6m,
            self.roll_cost_pct_6m,
        ]
    }
}

/// Load an upstream table, checking that it exists and has `required` columns.
fn load_table(path: &Path, required: &[&str]) -> Result<(DataFrame, Vec<String>)> {
    if !path.is_file() {
        return Err(DataError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let df = read_text_frame(path)?;
    let available = column_names(&df);
    let missing = missing_columns(&available, required);
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            missing,
            available,
        });
    }
    Ok((df, available))
}

fn symbols(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(text_values(df, name)?
        .into_iter()
        .map(|value| normalize_symbol(value.as_deref().unwrap_or_default()))
        .collect())
}

fn numbers(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(text_values(df, name)?
        .into_iter()
        .map(|value| value.as_deref().and_then(parse_number))
        .collect())
}

fn optional_numbers(df: &DataFrame, available: &[String], name: &str) -> Result<Vec<Option<f64>>> {
    if available.iter().any(|col| col == name) {
        numbers(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Read the monthly metric table.
///
/// `FUT_CURR_PRICE` is optional; the other monthly columns are required.
///
/// # Errors
///
/// [`DataError::MissingInput`] if the file is absent, [`DataError::MissingColumns`]
/// naming the absent columns otherwise.
pub fn read_monthly_table(path: &Path) -> Result<Vec<MonthlyMetricRow>> {
    let (df, available) = load_table(
        path,
        &["SYMBOL", "FUT_NEXT_PRICE", "ROLL_COST_PCT_M", "ROLL_OI_PCT_M"],
    )?;

    let symbols = symbols(&df, "SYMBOL")?;
    let curr = optional_numbers(&df, &available, "FUT_CURR_PRICE")?;
    let next = numbers(&df, "FUT_NEXT_PRICE")?;
    let cost = numbers(&df, "ROLL_COST_PCT_M")?;
    let oi = numbers(&df, "ROLL_OI_PCT_M")?;

    Ok(symbols
        .into_iter()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_empty())
        .map(|(i, symbol)| MonthlyMetricRow {
            symbol,
            fut_curr_price: curr[i],
            fut_next_price: next[i],
            roll_cost_pct: cost[i],
            roll_oi_pct: oi[i],
        })
        .collect())
}

/// Read the trailing-window metric table.
///
/// # Errors
///
/// [`DataError::MissingInput`] if the file is absent, [`DataError::MissingColumns`]
/// naming the absent columns otherwise.
pub fn read_six_month_table(path: &Path) -> Result<Vec<SixMonthMetricRow>> {
    let (df, _) = load_table(path, SixMonthMetricRow::COLUMNS)?;

    let symbols = symbols(&df, "SYMBOL")?;
    let oi = numbers(&df, "ROLL_OI_PCT_6M")?;
    let cost = numbers(&df, "ROLL_COST_PCT_6M")?;

    Ok(symbols
        .into_iter()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_empty())
        .map(|(i, symbol)| SixMonthMetricRow {
            symbol,
            roll_oi_pct: oi[i],
            roll_cost_pct: cost[i],
        })
        .collect())
}

/// Read a spot table, detecting the close column among its historical spellings.
///
/// # Errors
///
/// [`DataError::ColumnNotFound`] listing the available columns when none of
/// [`SpotColumn::candidates`] is present. This is never recovered from.
pub fn read_spot_table(path: &Path, which: SpotColumn) -> Result<Vec<SpotRow>> {
    let (df, available) = load_table(path, &["SYMBOL"])?;
    let close_column = resolve_column(&available, which.candidates(), which.label())?;

    let symbols = symbols(&df, "SYMBOL")?;
    let closes = numbers(&df, &close_column)?;
    let dates = match ["TRADE_DATE", "TradDt"]
        .iter()
        .find(|name| available.iter().any(|col| col == *name))
    {
        Some(name) => text_values(&df, name)?
            .into_iter()
            .map(|value| value.as_deref().and_then(parse_day_first))
            .collect(),
        None => vec![None; df.height()],
    };

    Ok(symbols
        .into_iter()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_empty())
        .map(|(i, symbol)| SpotRow {
            trade_date: dates[i],
            symbol,
            close: closes[i],
        })
        .collect())
}

/// Read the reconciled table back.
///
/// # Errors
///
/// [`DataError::MissingInput`] if the file is absent, [`DataError::MissingColumns`]
/// naming the absent columns otherwise.
pub fn read_reconciled_table(path: &Path) -> Result<Vec<ReconciledRow>> {
    let (df, _) = load_table(path, ReconciledRow::COLUMNS)?;

    let symbols = symbols(&df, "SYMBOL")?;
    let columns = ReconciledRow::COLUMNS[1..]
        .iter()
        .map(|name| numbers(&df, name))
        .collect::<Result<Vec<_>>>()?;

    Ok(symbols
        .into_iter()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_empty())
        .map(|(i, symbol)| ReconciledRow {
            symbol,
            spot_close: columns[0][i],
            prev_spot_close: columns[1][i],
            fut_next_price: columns[2][i],
            roll_cost_pct_m: columns[3][i],
            roll_oi_pct_m: columns[4][i],
            roll_oi_pct_6m: columns[5][i],
            roll_cost_pct_6m: columns[6][i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rollover-tables-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_spot_table_detects_legacy_previous_header() {
        let path = scratch(
            "prev_legacy.csv",
            "TradDt,SYMBOL,pre_SPOT_CLOSE\n2024-02-29, tcs ,3900.25\n",
        );

        let rows = read_spot_table(&path, SpotColumn::Previous).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "TCS");
        assert_eq!(rows[0].close, Some(3900.25));
        assert_eq!(rows[0].trade_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_spot_table_unknown_header_is_fatal() {
        let path = scratch("spot_foo.csv", "SYMBOL,FOO\nABC,1\n");

        let err = read_spot_table(&path, SpotColumn::Current).unwrap_err();
        match &err {
            DataError::ColumnNotFound { label, available } => {
                assert_eq!(label, "Current spot close");
                assert_eq!(available, &vec!["SYMBOL".to_string(), "FOO".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_skippable());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_monthly_table_requires_columns() {
        let path = scratch("monthly_bad.csv", "SYMBOL,ROLL_COST_PCT_M\nABC,1\n");

        let err = read_monthly_table(&path).unwrap_err();
        match err {
            DataError::MissingColumns { missing, .. } => {
                assert_eq!(
                    missing,
                    vec!["FUT_NEXT_PRICE".to_string(), "ROLL_OI_PCT_M".to_string()]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_monthly_table_without_current_price() {
        let path = scratch(
            "monthly_ok.csv",
            "SYMBOL,FUT_NEXT_PRICE,ROLL_COST_PCT_M,ROLL_OI_PCT_M\nabc,55,10,\n",
        );

        let rows = read_monthly_table(&path).unwrap();
        assert_eq!(
            rows,
            vec![MonthlyMetricRow {
                symbol: "ABC".to_string(),
                fut_curr_price: None,
                fut_next_price: Some(55.0),
                roll_cost_pct: Some(10.0),
                roll_oi_pct: None,
            }]
        );
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_missing_input() {
        let path = std::env::temp_dir().join("rollover-tables-does-not-exist.csv");
        let err = read_six_month_table(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingInput { .. }));
    }

    #[test]
    fn test_reconciled_columns_are_fixed() {
        assert_eq!(ReconciledRow::COLUMNS.len(), 8);
        assert_eq!(ReconciledRow::COLUMNS[0], "SYMBOL");
        assert_eq!(ReconciledRow::COLUMNS[7], "ROLL_COST_PCT_6M");
    }
}
