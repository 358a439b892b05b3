#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kestrel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod metric;
pub mod normalize;
pub mod score;

pub use error::ScoreError;
pub use metric::{GroupKey, Metric};
pub use normalize::{IndustryRanks, NormalizedRecord, NormalizerConfig, normalize, percentile_ranks};
pub use score::{
    CompositeConfig, ScoredRecord, ScoringConfig, composite_rank, focus_score, score_all,
    validation_score,
};
