#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rollover/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cash;
pub mod discovery;
pub mod error;
pub mod normalize;
pub mod settlement;
pub mod tables;

pub use cash::{SpotQuote, read_cash_market_file};
pub use discovery::{SettlementFile, discover_cash_market_file, discover_settlement_files};
pub use error::{DataError, Result};
pub use settlement::{Observation, read_settlement_file};
pub use tables::{
    MonthlyMetricRow, ReconciledRow, SixMonthMetricRow, SpotColumn, SpotRow, TableSchema,
    read_monthly_table, read_reconciled_table, read_six_month_table, read_spot_table,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
