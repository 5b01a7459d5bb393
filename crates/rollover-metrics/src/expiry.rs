//! Per-symbol expiry aggregation.
//!
//! A settlement file lists many rows per contract (one per instrument and
//! strike). Rows are collapsed per `(symbol, expiry)` into an open-interest sum
//! and a mean close, then ordered by expiry into a ladder whose first three
//! rungs are the near, next and far contracts.

use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use rollover_data::Observation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of distinct expiries for rollover metrics to be defined.
pub const MIN_LADDER_LEN: usize = 3;

/// All observations for one `(symbol, expiry)` pair within one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirySlice {
    /// Symbol.
    pub symbol: String,

    /// Contract expiry.
    pub expiry_date: NaiveDate,

    /// Sum of open interest, `None` when every row was missing it.
    pub total_open_interest: Option<f64>,

    /// Mean close price, `None` when every row was missing it.
    pub mean_close_price: Option<f64>,
}

/// Chronologically ordered expiries for one symbol in one file.
///
/// Holds at least [`MIN_LADDER_LEN`] slices with strictly increasing expiry
/// dates; shorter ladders cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryLadder {
    symbol: String,
    slices: Vec<ExpirySlice>,
}

impl ExpiryLadder {
    /// Build a ladder, sorting by expiry.
    ///
    /// Returns `None` when fewer than [`MIN_LADDER_LEN`] distinct expiries are
    /// present. Duplicate expiries keep the first slice.
    pub fn new(symbol: impl Into<String>, mut slices: Vec<ExpirySlice>) -> Option<Self> {
        slices.sort_by_key(|slice| slice.expiry_date);
        slices.dedup_by_key(|slice| slice.expiry_date);
        (slices.len() >= MIN_LADDER_LEN).then(|| Self {
            symbol: symbol.into(),
            slices,
        })
    }

    /// Symbol the ladder belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All slices, ascending by expiry.
    pub fn slices(&self) -> &[ExpirySlice] {
        &self.slices
    }

    /// Nearest expiry.
    pub fn near(&self) -> &ExpirySlice {
        &self.slices[0]
    }

    /// Second expiry.
    pub fn next(&self) -> &ExpirySlice {
        &self.slices[1]
    }

    /// Third expiry.
    pub fn far(&self) -> &ExpirySlice {
        &self.slices[2]
    }

    /// Number of listed expiries.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always `false` for a constructed ladder.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Collapse observations into expiry slices, grouped by symbol.
///
/// Rows without an expiry date cannot be placed on a ladder and are ignored.
/// Within each symbol the slices are ascending by expiry.
///
/// # Errors
///
/// Returns an error if the underlying frame operations fail.
pub fn aggregate_expiries(
    observations: &[Observation],
) -> Result<BTreeMap<String, Vec<ExpirySlice>>> {
    let dated: Vec<(&Observation, NaiveDate)> = observations
        .iter()
        .filter_map(|obs| obs.expiry_date.map(|expiry| (obs, expiry)))
        .collect();

    let frame = DataFrame::new(vec![
        Column::new(
            "symbol".into(),
            dated.iter().map(|(o, _)| o.symbol.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "expiry".into(),
            dated
                .iter()
                .map(|(_, e)| e.num_days_from_ce())
                .collect::<Vec<i32>>(),
        ),
        Column::new(
            "oi".into(),
            dated.iter().map(|(o, _)| o.open_interest).collect::<Vec<_>>(),
        ),
        Column::new(
            "close".into(),
            dated.iter().map(|(o, _)| o.close_price).collect::<Vec<_>>(),
        ),
    ])?;

    // sum() of an all-null group is 0; keep it null instead.
    let grouped = frame
        .lazy()
        .group_by([col("symbol"), col("expiry")])
        .agg([
            when(col("oi").count().gt(lit(0)))
                .then(col("oi").sum())
                .otherwise(lit(NULL).cast(DataType::Float64))
                .alias("oi"),
            col("close").mean().alias("close"),
        ])
        .sort(["symbol", "expiry"], Default::default())
        .collect()?;

    let symbols = grouped.column("symbol")?.str()?;
    let expiries = grouped.column("expiry")?.i32()?;
    let oi = grouped.column("oi")?.f64()?;
    let close = grouped.column("close")?.f64()?;

    let mut by_symbol: BTreeMap<String, Vec<ExpirySlice>> = BTreeMap::new();
    for i in 0..grouped.height() {
        let (Some(symbol), Some(expiry_date)) = (
            symbols.get(i),
            expiries.get(i).and_then(NaiveDate::from_num_days_from_ce_opt),
        ) else {
            continue;
        };
        by_symbol
            .entry(symbol.to_string())
            .or_default()
            .push(ExpirySlice {
                symbol: symbol.to_string(),
                expiry_date,
                total_open_interest: oi.get(i),
                mean_close_price: close.get(i),
            });
    }
    Ok(by_symbol)
}

/// Build every complete ladder in a file, ordered by symbol.
///
/// Symbols with fewer than [`MIN_LADDER_LEN`] expiries are silently dropped.
///
/// # Errors
///
/// Returns an error if expiry aggregation fails.
pub fn build_ladders(observations: &[Observation]) -> Result<Vec<ExpiryLadder>> {
    Ok(aggregate_expiries(observations)?
        .into_iter()
        .filter_map(|(symbol, slices)| ExpiryLadder::new(symbol, slices))
        .collect())
}
