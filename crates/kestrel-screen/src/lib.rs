#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod enrich;
pub mod error;
pub mod filter;
pub mod rationale;
pub mod weighting;

pub use enrich::{EnrichedRecord, join_sentiment};
pub use error::{Result, ScreenError};
pub use filter::{ScreeningConfig, ShortlistRecord, filter_candidates, screen};
pub use rationale::{BASELINE_LABEL, RationaleTag, rationale, rationale_tags};
pub use weighting::{MARKET_CAP_UNIT, WeightedRecord, assign_weights, portfolio_weights};
