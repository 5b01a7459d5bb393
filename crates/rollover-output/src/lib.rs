#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rollover/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod layout;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, Table};
pub use layout::{LayoutRow, SectionedTable, sectioned};
pub use summary::{RunSummary, StageSummary};
