//! Header and value normalization shared by every loader.
//!
//! Exchange exports disagree on header spelling, casing and decoration, and
//! individual cells are frequently blank or malformed. The helpers here turn
//! both into canonical form without ever failing on a single value.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::path::Path;

/// Header spellings that all mean the contract expiry date.
const EXPIRY_ALIASES: &[&str] = &["EXPIRY_DT", "EXPIRY_DATE"];

/// Canonical name for the contract expiry column.
pub const EXP_DATE: &str = "EXP_DATE";

/// Day-first date layouts, tried in order.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d-%b-%Y", "%d-%m-%Y", "%d/%m/%Y", "%d %b %Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
    "%d-%b-%y", "%d-%m-%y", "%d/%m/%y",
];

/// Earliest year accepted from a parsed date; guards against two-digit years
/// being read by a four-digit layout.
const MIN_YEAR: i32 = 1900;

/// Normalize a raw header: trim, upper-case and drop `*` decorations.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase().replace('*', "")
}

/// Normalize a futures settlement header, folding expiry aliases into [`EXP_DATE`].
pub fn canonical_futures_header(raw: &str) -> String {
    let header = normalize_header(raw);
    if EXPIRY_ALIASES.contains(&header.as_str()) {
        EXP_DATE.to_string()
    } else {
        header
    }
}

/// Normalize a symbol value: trim and upper-case.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parse a date the way exchange files write them, day first.
///
/// A trailing time component (`28-Mar-2024 15:30:00`, `2024-03-28T00:00:00`)
/// is ignored. Returns `None` for anything unrecognized.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DAY_FIRST_FORMATS.iter().find_map(|format| {
        let (date, rest) = NaiveDate::parse_and_remainder(trimmed, format).ok()?;
        let rest_is_time = rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T');
        (rest_is_time && date.year() >= MIN_YEAR).then_some(date)
    })
}

/// Parse a numeric cell, mapping blanks, junk and NaN to `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Required columns that are absent from `available`.
pub fn missing_columns(available: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !available.iter().any(|col| col == *name))
        .map(|name| (*name).to_string())
        .collect()
}

/// Pick the first candidate spelling present in `available`.
///
/// Candidate order decides which spelling wins when a table carries more than
/// one of them. Matching is exact.
pub fn resolve_column(available: &[String], candidates: &[&str], label: &str) -> Result<String> {
    candidates
        .iter()
        .find(|candidate| available.iter().any(|col| col == *candidate))
        .map(|candidate| (*candidate).to_string())
        .ok_or_else(|| DataError::ColumnNotFound {
            label: label.to_string(),
            available: available.to_vec(),
        })
}

/// Read a delimited file with every column as text.
///
/// Schema inference is disabled so that a column with a single malformed value
/// is not rejected wholesale; coercion happens per value afterwards.
pub fn read_text_frame(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Column names of a frame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Text values of one column.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
