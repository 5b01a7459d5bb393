#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rollover/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod report;
pub mod sector;

// Re-export the pipeline crates
pub use rollover_data as data;
pub use rollover_metrics as metrics;
pub use rollover_output as output;

// Re-export common sector types
pub use report::{SectorReport, SectorReportRow};
pub use sector::{NseSector, SectorClassifier, SectorMap, UNMAPPED, canonical_symbol};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
