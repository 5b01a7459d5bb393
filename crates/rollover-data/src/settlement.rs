//! Futures settlement file normalizer.
//!
//! Turns one raw derivatives settlement export into typed [`Observation`]s.
//! Header variants are folded into canonical names and every value is coerced
//! independently, so a malformed cell nulls a field instead of dropping the row.

use crate::error::{DataError, Result};
use crate::normalize::{
    EXP_DATE, canonical_futures_header, column_names, missing_columns, normalize_symbol,
    parse_day_first, parse_number, read_text_frame, text_values,
};
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Columns a futures settlement file must carry after normalization.
pub const REQUIRED_COLUMNS: &[&str] = &["SYMBOL", EXP_DATE, "OPEN_INT", "CLOSE_PRICE"];

/// One settlement row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Underlying symbol, trimmed and upper-cased.
    pub symbol: String,

    /// Contract expiry date.
    pub expiry_date: Option<NaiveDate>,

    /// Open interest of the contract row.
    pub open_interest: Option<f64>,

    /// Settlement close price of the contract row.
    pub close_price: Option<f64>,

    /// Trade date of the file the row came from.
    pub source_date: NaiveDate,
}

impl Observation {
    /// Create a new observation.
    pub fn new(
        symbol: impl Into<String>,
        expiry_date: Option<NaiveDate>,
        open_interest: Option<f64>,
        close_price: Option<f64>,
        source_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            expiry_date,
            open_interest,
            close_price,
            source_date,
        }
    }
}

/// Read and normalize one futures settlement file.
///
/// # Errors
///
/// Returns [`DataError::MissingColumns`] when any of [`REQUIRED_COLUMNS`] is
/// absent after header normalization (including an empty file). Callers treat
/// that as a skippable file. IO and CSV framing errors are returned as-is.
pub fn read_settlement_file(path: &Path, source_date: NaiveDate) -> Result<Vec<Observation>> {
    let mut df = match read_text_frame(path) {
        Ok(df) => df,
        Err(DataError::Polars(PolarsError::NoData(_))) => {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                missing: REQUIRED_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
                available: Vec::new(),
            });
        }
        Err(err) => return Err(err),
    };

    let headers: Vec<String> = column_names(&df)
        .iter()
        .map(|name| canonical_futures_header(name))
        .collect();

    let missing = missing_columns(&headers, REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            missing,
            available: headers,
        });
    }

    // Two raw headers can fold into the same canonical name; the first wins.
    let positions: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| headers.iter().position(|h| h == name))
        .collect();
    let raw_names = column_names(&df);
    df = df.select(positions.iter().map(|&i| raw_names[i].as_str()))?;
    df.set_column_names(REQUIRED_COLUMNS.iter().copied())?;

    let symbols = text_values(&df, "SYMBOL")?;
    let expiries = text_values(&df, EXP_DATE)?;
    let open_interest = text_values(&df, "OPEN_INT")?;
    let close_prices = text_values(&df, "CLOSE_PRICE")?;

    let observations: Vec<Observation> = symbols
        .into_iter()
        .zip(expiries)
        .zip(open_interest.into_iter().zip(close_prices))
        .map(|((symbol, expiry), (oi, close))| {
            Observation::new(
                normalize_symbol(symbol.as_deref().unwrap_or_default()),
                expiry.as_deref().and_then(parse_day_first),
                oi.as_deref().and_then(parse_number),
                close.as_deref().and_then(parse_number),
                source_date,
            )
        })
        .collect();

    debug!(
        file = %path.display(),
        rows = observations.len(),
        "normalized settlement file"
    );

    Ok(observations)
}
