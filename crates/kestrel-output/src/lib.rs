#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod row;

pub use export::{ExportError, ExportFormat, Exporter, OutputPaths, read_parquet, write_outputs};
pub use report::{ScreeningReport, StrategySummary};
pub use row::ScreeningRow;
