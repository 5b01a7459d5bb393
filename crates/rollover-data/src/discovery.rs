//! Input file discovery.
//!
//! Daily futures settlement files are named `fo<DDMMYYYY>.csv`; the trade date
//! lives only in the file name. Cash-market snapshots are named
//! `BhavCopy_NSE_CM_*.csv`.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Prefix of futures settlement file names.
const SETTLEMENT_PREFIX: &str = "fo";

/// Prefix of cash-market bhavcopy file names.
const CASH_MARKET_PREFIX: &str = "BhavCopy_NSE_CM_";

/// A futures settlement file together with the trade date it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementFile {
    /// Location of the file.
    pub path: PathBuf,

    /// Trade date parsed from the file name, if the name encodes one.
    pub trade_date: Option<NaiveDate>,
}

impl SettlementFile {
    /// Trade date, or [`DataError::InvalidFileName`] when the name does not carry one.
    pub fn require_trade_date(&self) -> Result<NaiveDate> {
        self.trade_date.ok_or_else(|| DataError::InvalidFileName {
            path: self.path.clone(),
        })
    }
}

/// Parse the `DDMMYYYY` trade date out of a settlement file stem (`fo28032024`).
pub fn trade_date_from_stem(stem: &str) -> Option<NaiveDate> {
    let digits = stem.strip_prefix(SETTLEMENT_PREFIX)?;
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, "%d%m%Y").ok()
}

fn is_settlement_name(path: &Path) -> bool {
    let has_csv_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let stem_matches = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(SETTLEMENT_PREFIX))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
    has_csv_extension && stem_matches
}

fn is_cash_market_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(CASH_MARKET_PREFIX) && name.ends_with(".csv"))
}

fn sorted_files(dir: &Path, matches: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DataError::MissingInput {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && matches(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Find every futures settlement file in `dir`, sorted by name.
///
/// # Errors
///
/// Fails with [`DataError::NoInputFiles`] when nothing matches and with
/// [`DataError::MissingInput`] when `dir` does not exist.
pub fn discover_settlement_files(dir: &Path) -> Result<Vec<SettlementFile>> {
    let files = sorted_files(dir, is_settlement_name)?;
    if files.is_empty() {
        return Err(DataError::NoInputFiles {
            dir: dir.to_path_buf(),
            pattern: "fo*.csv".to_string(),
        });
    }

    Ok(files
        .into_iter()
        .map(|path| {
            let trade_date = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(trade_date_from_stem);
            SettlementFile { path, trade_date }
        })
        .collect())
}

/// Find the cash-market bhavcopy in `dir`.
///
/// The first file in name order is used; any others are logged and ignored.
///
/// # Errors
///
/// Fails with [`DataError::NoInputFiles`] when no bhavcopy is present.
pub fn discover_cash_market_file(dir: &Path) -> Result<PathBuf> {
    let mut files = sorted_files(dir, is_cash_market_name)?;
    if files.len() > 1 {
        warn!(
            dir = %dir.display(),
            count = files.len(),
            "multiple CM bhavcopies found, using the first by name"
        );
    }
    if files.is_empty() {
        return Err(DataError::NoInputFiles {
            dir: dir.to_path_buf(),
            pattern: format!("{CASH_MARKET_PREFIX}*.csv"),
        });
    }
    Ok(files.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fo28032024", NaiveDate::from_ymd_opt(2024, 3, 28))]
    #[case("fo01012025", NaiveDate::from_ymd_opt(2025, 1, 1))]
    #[case("fo32012025", None)]
    #[case("fo2803202", None)]
    #[case("cm28032024", None)]
    #[case("fo", None)]
    fn test_trade_date_from_stem(#[case] stem: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(trade_date_from_stem(stem), expected);
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("rollover-discovery-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in [
            "fo02022024.csv",
            "fo01022024.csv",
            "foreign.csv",
            "fo03022024.txt",
            "BhavCopy_NSE_CM_0_0_0_20240202_F_0000.csv",
        ] {
            fs::write(dir.join(name), "SYMBOL\n").unwrap();
        }

        let files = discover_settlement_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["fo01022024.csv", "fo02022024.csv"]);
        assert_eq!(files[0].trade_date, NaiveDate::from_ymd_opt(2024, 2, 1));

        let cash = discover_cash_market_file(&dir).unwrap();
        assert!(cash.ends_with("BhavCopy_NSE_CM_0_0_0_20240202_F_0000.csv"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_directory_is_fatal() {
        let dir =
            std::env::temp_dir().join(format!("rollover-discovery-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let err = discover_settlement_files(&dir).unwrap_err();
        assert!(matches!(err, DataError::NoInputFiles { .. }));
        assert!(!err.is_skippable());

        let err = discover_cash_market_file(&dir).unwrap_err();
        assert!(matches!(err, DataError::NoInputFiles { .. }));

        fs::remove_dir_all(&dir).ok();
    }
}
