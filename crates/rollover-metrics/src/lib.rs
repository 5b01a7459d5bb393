#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rollover/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod expiry;
pub mod reconcile;
pub mod rollover;
pub mod stats;
pub mod window;

pub use error::{MetricsError, Result};
pub use expiry::{ExpiryLadder, ExpirySlice, MIN_LADDER_LEN, aggregate_expiries, build_ladders};
pub use reconcile::reconcile;
pub use rollover::{RolloverMetric, compute_file_metrics, roll_cost_pct, roll_oi_pct};
pub use window::{DatedMetric, MetricWindow, MonthlyWindow, TrailingWindow, year_month};
