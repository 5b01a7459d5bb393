//! Rollover metric calculation.
//!
//! Given a ladder with near (1), next (2) and far (3) contracts:
//!
//! - roll OI % = `(OI2 + OI3) / (OI1 + OI2 + OI3) * 100`, the share of open
//!   interest that has already moved out of the near contract;
//! - roll cost % = `(CP2 - CP1) / CP1 * 100`, the premium (or discount) paid to
//!   roll a position from the near to the next contract.
//!
//! Both are `None` when an input is missing or the denominator is zero. Values
//! are not rounded here; rounding happens once per window.

use crate::error::Result;
use crate::expiry::{ExpiryLadder, build_ladders};
use rollover_data::Observation;
use serde::{Deserialize, Serialize};

/// Rollover metrics for one symbol in one settlement file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverMetric {
    /// Symbol.
    pub symbol: String,

    /// Mean close of the near contract.
    pub near_price: Option<f64>,

    /// Mean close of the next contract.
    pub next_price: Option<f64>,

    /// Roll cost %.
    pub roll_cost_pct: Option<f64>,

    /// Roll OI %.
    pub roll_oi_pct: Option<f64>,
}

impl RolloverMetric {
    /// Derive the metrics from a ladder's first three contracts.
    pub fn from_ladder(ladder: &ExpiryLadder) -> Self {
        let near_price = ladder.near().mean_close_price;
        let next_price = ladder.next().mean_close_price;

        Self {
            symbol: ladder.symbol().to_string(),
            near_price,
            next_price,
            roll_cost_pct: roll_cost_pct(near_price, next_price),
            roll_oi_pct: roll_oi_pct(
                ladder.near().total_open_interest,
                ladder.next().total_open_interest,
                ladder.far().total_open_interest,
            ),
        }
    }
}

/// Share of open interest held outside the near contract, in percent.
///
/// `None` if any leg is missing or the total is zero.
pub fn roll_oi_pct(near: Option<f64>, next: Option<f64>, far: Option<f64>) -> Option<f64> {
    let (near, next, far) = (near?, next?, far?);
    let total = near + next + far;
    (total != 0.0).then(|| (next + far) / total * 100.0)
}

/// Percentage difference between the next and near contract prices.
///
/// `None` if either price is missing or the near price is zero.
pub fn roll_cost_pct(near_price: Option<f64>, next_price: Option<f64>) -> Option<f64> {
    let (near, next) = (near_price?, next_price?);
    (near != 0.0).then(|| (next - near) / near * 100.0)
}

/// Compute every symbol's metrics for one settlement file.
///
/// Symbols with fewer than three expiries produce nothing.
///
/// # Errors
///
/// Returns an error if expiry aggregation fails.
pub fn compute_file_metrics(observations: &[Observation]) -> Result<Vec<RolloverMetric>> {
    Ok(build_ladders(observations)?
        .iter()
        .map(RolloverMetric::from_ladder)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[test]
    fn test_roll_oi_pct() {
        let value = roll_oi_pct(Some(100.0), Some(200.0), Some(300.0)).unwrap();
        assert_relative_eq!(value, 500.0 / 600.0 * 100.0);
    }

    #[rstest]
    #[case(None, Some(1.0), Some(1.0))]
    #[case(Some(1.0), None, Some(1.0))]
    #[case(Some(1.0), Some(1.0), None)]
    #[case(Some(0.0), Some(0.0), Some(0.0))]
    #[case(Some(-5.0), Some(2.0), Some(3.0))]
    fn test_roll_oi_pct_guards(
        #[case] near: Option<f64>,
        #[case] next: Option<f64>,
        #[case] far: Option<f64>,
    ) {
        assert_eq!(roll_oi_pct(near, next, far), None);
    }

    #[test]
    fn test_roll_cost_pct() {
        assert_relative_eq!(roll_cost_pct(Some(50.0), Some(55.0)).unwrap(), 10.0);
        assert_relative_eq!(roll_cost_pct(Some(50.0), Some(49.0)).unwrap(), -2.0);
    }

    #[rstest]
    #[case(None, Some(55.0))]
    #[case(Some(50.0), None)]
    #[case(Some(0.0), Some(55.0))]
    fn test_roll_cost_pct_guards(#[case] near: Option<f64>, #[case] next: Option<f64>) {
        assert_eq!(roll_cost_pct(near, next), None);
    }

    #[test]
    fn test_file_metrics_use_first_three_expiries() {
        let trade = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let e = |m: u32| NaiveDate::from_ymd_opt(2024, m, 25);
        let observations = vec![
            Observation::new("ABC", e(3), Some(100.0), Some(50.0), trade),
            Observation::new("ABC", e(4), Some(200.0), Some(55.0), trade),
            Observation::new("ABC", e(5), Some(300.0), Some(60.0), trade),
            Observation::new("ABC", e(6), Some(10_000.0), Some(99.0), trade),
        ];

        let metrics = compute_file_metrics(&observations).unwrap();
        assert_eq!(metrics.len(), 1);
        let abc = &metrics[0];
        assert_eq!(abc.near_price, Some(50.0));
        assert_eq!(abc.next_price, Some(55.0));
        assert_relative_eq!(abc.roll_cost_pct.unwrap(), 10.0);
        assert_relative_eq!(abc.roll_oi_pct.unwrap(), 83.333_333_333, epsilon = 1e-6);
    }
}
