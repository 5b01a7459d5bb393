//! Window aggregation of per-file rollover metrics.
//!
//! Two windows share one core: group per-file metrics by symbol and take the
//! null-skipping mean of each column, rounded to four decimals.
//!
//! - [`MonthlyWindow`] averages every file it is given.
//! - [`TrailingWindow`] first buckets each file into its calendar month and keeps
//!   only the most recent N months, counted back from the latest month present
//!   in the data rather than from the wall clock.

use crate::error::{MetricsError, Result};
use crate::rollover::RolloverMetric;
use crate::stats::round_metric;
use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;
use rollover_data::{MonthlyMetricRow, SixMonthMetricRow};
use tracing::info;

/// Default trailing window length in months.
pub const DEFAULT_TRAILING_MONTHS: u32 = 6;

/// A metric tagged with the trade date of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedMetric {
    /// Trade date of the source file.
    pub trade_date: NaiveDate,

    /// Metrics derived from that file.
    pub metric: RolloverMetric,
}

impl DatedMetric {
    /// Create a new dated metric.
    pub const fn new(trade_date: NaiveDate, metric: RolloverMetric) -> Self {
        Self { trade_date, metric }
    }

    /// Calendar month bucket of the source file.
    pub fn year_month(&self) -> NaiveDate {
        year_month(self.trade_date)
    }
}

/// First day of the month containing `date`.
pub fn year_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Trait for windows that turn per-file metrics into one row per symbol.
pub trait MetricWindow {
    /// Output row type.
    type Row;

    /// Short label used in logs.
    fn label(&self) -> String;

    /// Aggregate the metrics into rows ordered by symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying frame operations fail.
    fn aggregate(&self, metrics: &[DatedMetric]) -> Result<Vec<Self::Row>>;
}

/// Build a frame from metric rows and average every column per symbol.
fn mean_by_symbol(metrics: &[&RolloverMetric]) -> Result<DataFrame> {
    let symbols: Vec<String> = metrics.iter().map(|m| m.symbol.clone()).collect();
    let near: Vec<Option<f64>> = metrics.iter().map(|m| m.near_price).collect();
    let next: Vec<Option<f64>> = metrics.iter().map(|m| m.next_price).collect();
    let cost: Vec<Option<f64>> = metrics.iter().map(|m| m.roll_cost_pct).collect();
    let oi: Vec<Option<f64>> = metrics.iter().map(|m| m.roll_oi_pct).collect();

    let frame = DataFrame::new(vec![
        Column::new("symbol".into(), symbols),
        Column::new("near_price".into(), near),
        Column::new("next_price".into(), next),
        Column::new("roll_cost".into(), cost),
        Column::new("roll_oi".into(), oi),
    ])?;

    // mean() skips nulls and yields null for an all-null group.
    let averaged = frame
        .lazy()
        .group_by([col("symbol")])
        .agg([
            col("near_price").mean(),
            col("next_price").mean(),
            col("roll_cost").mean(),
            col("roll_oi").mean(),
        ])
        .sort(["symbol"], Default::default())
        .collect()?;

    Ok(averaged)
}

/// Averaged values of one symbol, extracted from a [`mean_by_symbol`] frame.
struct SymbolMeans {
    symbol: String,
    near_price: Option<f64>,
    next_price: Option<f64>,
    roll_cost: Option<f64>,
    roll_oi: Option<f64>,
}

fn extract_means(frame: &DataFrame) -> Result<Vec<SymbolMeans>> {
    let symbols = frame.column("symbol")?.str()?;
    let near = frame.column("near_price")?.f64()?;
    let next = frame.column("next_price")?.f64()?;
    let cost = frame.column("roll_cost")?.f64()?;
    let oi = frame.column("roll_oi")?.f64()?;

    Ok((0..frame.height())
        .filter_map(|i| {
            symbols.get(i).map(|symbol| SymbolMeans {
                symbol: symbol.to_string(),
                near_price: round_metric(near.get(i)),
                next_price: round_metric(next.get(i)),
                roll_cost: round_metric(cost.get(i)),
                roll_oi: round_metric(oi.get(i)),
            })
        })
        .collect())
}

/// Single-period window: every supplied file belongs to the reporting month.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyWindow;

impl MetricWindow for MonthlyWindow {
    type Row = MonthlyMetricRow;

    fn label(&self) -> String {
        "monthly".to_string()
    }

    fn aggregate(&self, metrics: &[DatedMetric]) -> Result<Vec<Self::Row>> {
        let rows: Vec<&RolloverMetric> = metrics.iter().map(|m| &m.metric).collect();
        let frame = mean_by_symbol(&rows)?;

        let rows: Vec<MonthlyMetricRow> = extract_means(&frame)?
            .into_iter()
            .map(|m| MonthlyMetricRow {
                symbol: m.symbol,
                fut_curr_price: m.near_price,
                fut_next_price: m.next_price,
                roll_cost_pct: m.roll_cost,
                roll_oi_pct: m.roll_oi,
            })
            .collect();

        info!(
            window = %self.label(),
            observations = metrics.len(),
            symbols = rows.len(),
            "aggregated window"
        );
        Ok(rows)
    }
}

/// Trailing window of the most recent N calendar months.
#[derive(Debug, Clone, Copy)]
pub struct TrailingWindow {
    months: u32,
}

impl TrailingWindow {
    /// Create a window spanning `months` calendar months.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidWindow`] for a zero-length window.
    pub fn new(months: u32) -> Result<Self> {
        if months == 0 {
            return Err(MetricsError::InvalidWindow { months });
        }
        Ok(Self { months })
    }

    /// Window length in months.
    pub const fn months(&self) -> u32 {
        self.months
    }

    /// First month included when the latest month present is `latest`.
    ///
    /// With N = 6 and latest 2024-09 the window starts at 2024-04.
    ///
    /// The window spans exactly N calendar months including the latest one.
    /// Filtering on `month >= latest - N months` would instead span N + 1
    /// months (2024-03 through 2024-09 for the case above).
    pub fn start_month(&self, latest: NaiveDate) -> NaiveDate {
        year_month(latest)
            .checked_sub_months(Months::new(self.months - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// First and last month covered, or `None` when there are no metrics.
    pub fn bounds(&self, metrics: &[DatedMetric]) -> Option<(NaiveDate, NaiveDate)> {
        let latest = metrics.iter().map(DatedMetric::year_month).max()?;
        Some((self.start_month(latest), latest))
    }
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self {
            months: DEFAULT_TRAILING_MONTHS,
        }
    }
}

impl MetricWindow for TrailingWindow {
    type Row = SixMonthMetricRow;

    fn label(&self) -> String {
        format!("trailing-{}m", self.months)
    }

    fn aggregate(&self, metrics: &[DatedMetric]) -> Result<Vec<Self::Row>> {
        let Some((start, latest)) = self.bounds(metrics) else {
            return Ok(Vec::new());
        };

        let in_window: Vec<&RolloverMetric> = metrics
            .iter()
            .filter(|m| m.year_month() >= start)
            .map(|m| &m.metric)
            .collect();
        let frame = mean_by_symbol(&in_window)?;

        let rows: Vec<SixMonthMetricRow> = extract_means(&frame)?
            .into_iter()
            .map(|m| SixMonthMetricRow {
                symbol: m.symbol,
                roll_oi_pct: m.roll_oi,
                roll_cost_pct: m.roll_cost,
            })
            .collect();

        info!(
            window = %self.label(),
            from = %start.format("%Y-%m"),
            to = %latest.format("%Y-%m"),
            observations = in_window.len(),
            symbols = rows.len(),
            "aggregated window"
        );
        Ok(rows)
    }
}
