#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use kestrel_data as data;
pub use kestrel_factors as factors;
pub use kestrel_output as output;
pub use kestrel_screen as screen;

pub use config::{KestrelConfig, OutputConfig, ScanConfig, SentimentConfig, default_cache_dir};
pub use error::{ConfigError, PipelineError, Result};
pub use pipeline::{Pipeline, ScreeningOutcome, ScreeningRun};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
