//! Cash-market bhavcopy normalizer.
//!
//! Extracts equity spot closes from the exchange's cash-market settlement file.
//! Only the `CM` segment and `EQ` series are kept; other series (bonds, SME,
//! rights) would otherwise shadow the equity close for the same ticker.

use crate::error::{DataError, Result};
use crate::normalize::{
    column_names, missing_columns, normalize_symbol, parse_day_first, parse_number,
    read_text_frame, text_values,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Segment kept from the bhavcopy.
pub const SEGMENT: &str = "CM";

/// Security series kept from the bhavcopy.
pub const SERIES: &str = "EQ";

/// Columns a cash-market bhavcopy must carry. Names are matched exactly.
pub const REQUIRED_COLUMNS: &[&str] = &["TradDt", "TckrSymb", "ClsPric", "Sgmt", "SctySrs"];

/// Spot close for one symbol in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    /// Equity symbol, trimmed and upper-cased.
    pub symbol: String,

    /// Closing price.
    pub close_price: Option<f64>,

    /// Trade date of the snapshot.
    pub as_of: Option<NaiveDate>,
}

/// Read a cash-market bhavcopy and keep the `CM`/`EQ` rows.
///
/// # Errors
///
/// Returns [`DataError::MissingColumns`] if any of [`REQUIRED_COLUMNS`] is absent.
/// For this stage that is fatal: there is only one snapshot per period.
pub fn read_cash_market_file(path: &Path) -> Result<Vec<SpotQuote>> {
    let df = read_text_frame(path)?;
    let available = column_names(&df);
    let missing = missing_columns(&available, REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            missing,
            available,
        });
    }

    let segments = text_values(&df, "Sgmt")?;
    let series = text_values(&df, "SctySrs")?;
    let dates = text_values(&df, "TradDt")?;
    let symbols = text_values(&df, "TckrSymb")?;
    let closes = text_values(&df, "ClsPric")?;

    let quotes: Vec<SpotQuote> = segments
        .iter()
        .zip(&series)
        .zip(dates.iter().zip(symbols.iter().zip(&closes)))
        .filter(|((segment, series), _)| {
            segment.as_deref() == Some(SEGMENT) && series.as_deref() == Some(SERIES)
        })
        .map(|(_, (date, (symbol, close)))| SpotQuote {
            symbol: normalize_symbol(symbol.as_deref().unwrap_or_default()),
            close_price: close.as_deref().and_then(parse_number),
            as_of: date.as_deref().and_then(parse_day_first),
        })
        .collect();

    debug!(
        file = %path.display(),
        rows = df.height(),
        kept = quotes.len(),
        "normalized cash-market file"
    );

    Ok(quotes)
}
