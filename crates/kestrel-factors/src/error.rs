//! Row-level scoring errors.

use crate::metric::Metric;
use thiserror::Error;

/// A value inconsistency found while scoring a single row.
///
/// Never escapes the batch: the row's score degrades to zero instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// A rank was NaN or infinite
    #[error("non-finite rank for {metric}: {value}")]
    NonFiniteRank {
        /// Metric whose rank was invalid
        metric: Metric,
        /// Offending value
        value: f64,
    },

    /// A raw metric value was NaN or infinite
    #[error("non-finite value for {metric}: {value}")]
    NonFiniteValue {
        /// Metric whose raw value was invalid
        metric: Metric,
        /// Offending value
        value: f64,
    },
}
