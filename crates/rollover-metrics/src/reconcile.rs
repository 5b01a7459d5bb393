//! Multi-source reconciliation.
//!
//! The monthly table anchors the join: every symbol in it appears exactly once
//! in the result, and symbols found only in secondary tables are dropped.
//! A symbol missing from a secondary table yields nulls for that table's
//! columns, never a dropped row.

use crate::error::{MetricsError, Result};
use polars::prelude::*;
use rollover_data::normalize::normalize_symbol;
use rollover_data::{MonthlyMetricRow, ReconciledRow, SixMonthMetricRow, SpotRow};
use std::collections::HashSet;
use tracing::{info, warn};

/// Keep the first row per normalized symbol, preserving input order.
fn first_by_symbol<'a, T>(
    rows: &'a [T],
    symbol: impl Fn(&T) -> &str,
    table: &str,
) -> Vec<(String, &'a T)> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        let key = normalize_symbol(symbol(row));
        if seen.insert(key.clone()) {
            kept.push((key, row));
        }
    }
    let dropped = rows.len() - kept.len();
    if dropped > 0 {
        warn!(table, dropped, "duplicate symbols dropped, first occurrence kept");
    }
    kept
}

fn monthly_frame(rows: &[MonthlyMetricRow]) -> Result<DataFrame> {
    let rows = first_by_symbol(rows, |r| r.symbol.as_str(), "monthly");
    Ok(DataFrame::new(vec![
        Column::new(
            "SYMBOL".into(),
            rows.iter().map(|(s, _)| s.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "FUT_NEXT_PRICE".into(),
            rows.iter().map(|(_, r)| r.fut_next_price).collect::<Vec<_>>(),
        ),
        Column::new(
            "ROLL_COST_PCT_M".into(),
            rows.iter().map(|(_, r)| r.roll_cost_pct).collect::<Vec<_>>(),
        ),
        Column::new(
            "ROLL_OI_PCT_M".into(),
            rows.iter().map(|(_, r)| r.roll_oi_pct).collect::<Vec<_>>(),
        ),
    ])?)
}

fn six_month_frame(rows: &[SixMonthMetricRow]) -> Result<DataFrame> {
    let rows = first_by_symbol(rows, |r| r.symbol.as_str(), "six-month");
    Ok(DataFrame::new(vec![
        Column::new(
            "SYMBOL".into(),
            rows.iter().map(|(s, _)| s.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "ROLL_OI_PCT_6M".into(),
            rows.iter().map(|(_, r)| r.roll_oi_pct).collect::<Vec<_>>(),
        ),
        Column::new(
            "ROLL_COST_PCT_6M".into(),
            rows.iter().map(|(_, r)| r.roll_cost_pct).collect::<Vec<_>>(),
        ),
    ])?)
}

fn spot_frame(rows: &[SpotRow], close_column: &str, table: &str) -> Result<DataFrame> {
    let rows = first_by_symbol(rows, |r| r.symbol.as_str(), table);
    Ok(DataFrame::new(vec![
        Column::new(
            "SYMBOL".into(),
            rows.iter().map(|(s, _)| s.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            close_column.into(),
            rows.iter().map(|(_, r)| r.close).collect::<Vec<_>>(),
        ),
    ])?)
}

fn left_join(left: LazyFrame, right: DataFrame) -> LazyFrame {
    left.join(
        right.lazy(),
        [col("SYMBOL")],
        [col("SYMBOL")],
        JoinArgs::new(JoinType::Left),
    )
}

/// Merge the monthly, trailing-window and spot tables into one row per symbol.
///
/// `previous_spot` is optional; without it `PREV_SPOT_CLOSE` is null throughout.
/// Symbols are re-normalized and each table is deduplicated (first row wins)
/// before joining. Output is ordered by symbol.
///
/// # Errors
///
/// Returns an error if the frame operations fail, or
/// [`MetricsError::Cardinality`] if the result does not hold exactly one row
/// per monthly symbol.
pub fn reconcile(
    monthly: &[MonthlyMetricRow],
    six_month: &[SixMonthMetricRow],
    current_spot: &[SpotRow],
    previous_spot: Option<&[SpotRow]>,
) -> Result<Vec<ReconciledRow>> {
    let primary = monthly_frame(monthly)?;
    let expected = primary.height();

    let joined = [
        six_month_frame(six_month)?,
        spot_frame(current_spot, "SPOT_CLOSE", "current spot")?,
        spot_frame(previous_spot.unwrap_or_default(), "PREV_SPOT_CLOSE", "previous spot")?,
    ]
    .into_iter()
    .fold(primary.lazy(), left_join)
    .select([
        col("SYMBOL"),
        col("SPOT_CLOSE"),
        col("PREV_SPOT_CLOSE"),
        col("FUT_NEXT_PRICE"),
        col("ROLL_COST_PCT_M"),
        col("ROLL_OI_PCT_M"),
        col("ROLL_OI_PCT_6M"),
        col("ROLL_COST_PCT_6M"),
    ])
    .sort(["SYMBOL"], Default::default())
    .collect()?;

    if joined.height() != expected {
        return Err(MetricsError::Cardinality {
            expected,
            actual: joined.height(),
        });
    }

    let symbols = joined.column("SYMBOL")?.str()?;
    let spot = joined.column("SPOT_CLOSE")?.f64()?;
    let prev = joined.column("PREV_SPOT_CLOSE")?.f64()?;
    let next = joined.column("FUT_NEXT_PRICE")?.f64()?;
    let cost_m = joined.column("ROLL_COST_PCT_M")?.f64()?;
    let oi_m = joined.column("ROLL_OI_PCT_M")?.f64()?;
    let oi_6m = joined.column("ROLL_OI_PCT_6M")?.f64()?;
    let cost_6m = joined.column("ROLL_COST_PCT_6M")?.f64()?;

    let rows: Vec<ReconciledRow> = (0..joined.height())
        .filter_map(|i| {
            symbols.get(i).map(|symbol| ReconciledRow {
                symbol: symbol.to_string(),
                spot_close: spot.get(i),
                prev_spot_close: prev.get(i),
                fut_next_price: next.get(i),
                roll_cost_pct_m: cost_m.get(i),
                roll_oi_pct_m: oi_m.get(i),
                roll_oi_pct_6m: oi_6m.get(i),
                roll_cost_pct_6m: cost_6m.get(i),
            })
        })
        .collect();

    let without_spot = rows.iter().filter(|r| r.spot_close.is_none()).count();
    let without_six_month = rows
        .iter()
        .filter(|r| r.roll_oi_pct_6m.is_none() && r.roll_cost_pct_6m.is_none())
        .count();
    info!(
        symbols = rows.len(),
        without_spot,
        without_six_month,
        "reconciled tables"
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(symbol: &str) -> MonthlyMetricRow {
        MonthlyMetricRow {
            symbol: symbol.to_string(),
            fut_curr_price: Some(100.0),
            fut_next_price: Some(101.0),
            roll_cost_pct: Some(1.0),
            roll_oi_pct: Some(40.0),
        }
    }

    fn six(symbol: &str, oi: f64) -> SixMonthMetricRow {
        SixMonthMetricRow {
            symbol: symbol.to_string(),
            roll_oi_pct: Some(oi),
            roll_cost_pct: Some(0.5),
        }
    }

    fn spot(symbol: &str, close: f64) -> SpotRow {
        SpotRow {
            trade_date: None,
            symbol: symbol.to_string(),
            close: Some(close),
        }
    }

    #[test]
    fn test_output_symbols_equal_monthly_symbols() {
        let rows = reconcile(
            &[monthly("XYZ"), monthly("ABC")],
            &[six("ABC", 70.0), six("ONLYSIX", 10.0)],
            &[spot("ABC", 99.0), spot("ONLYSPOT", 1.0)],
            Some(&[spot("XYZ", 12.0)]),
        )
        .unwrap();

        let symbols: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ABC", "XYZ"]);

        assert_eq!(rows[0].spot_close, Some(99.0));
        assert_eq!(rows[0].prev_spot_close, None);
        assert_eq!(rows[0].roll_oi_pct_6m, Some(70.0));

        // XYZ has no current spot or six-month row: nulls, not a dropped row.
        assert_eq!(rows[1].spot_close, None);
        assert_eq!(rows[1].prev_spot_close, Some(12.0));
        assert_eq!(rows[1].roll_oi_pct_6m, None);
        assert_eq!(rows[1].fut_next_price, Some(101.0));
        assert_eq!(rows[1].roll_cost_pct_m, Some(1.0));
        assert_eq!(rows[1].roll_oi_pct_m, Some(40.0));
    }

    #[test]
    fn test_duplicate_secondary_rows_do_not_duplicate_output() {
        let rows = reconcile(
            &[monthly("ABC")],
            &[six("ABC", 70.0), six("abc ", 10.0)],
            &[spot("ABC", 99.0), spot("ABC", 1.0)],
            None,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].roll_oi_pct_6m, Some(70.0));
        assert_eq!(rows[0].spot_close, Some(99.0));
    }

    #[test]
    fn test_symbols_are_normalized_before_join() {
        let rows = reconcile(&[monthly(" abc")], &[six("ABC", 70.0)], &[spot("Abc", 5.0)], None)
            .unwrap();

        assert_eq!(rows[0].symbol, "ABC");
        assert_eq!(rows[0].roll_oi_pct_6m, Some(70.0));
        assert_eq!(rows[0].spot_close, Some(5.0));
    }

    #[test]
    fn test_empty_monthly_gives_empty_output() {
        let rows = reconcile(&[], &[six("ABC", 1.0)], &[spot("ABC", 1.0)], None).unwrap();
        assert!(rows.is_empty());
    }
}
