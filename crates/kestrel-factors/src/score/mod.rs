//! Focus and validation scoring.
//!
//! Scores are computed per row from the industry ranks attached by
//! [`normalize`](crate::normalize::normalize). A row whose inputs are not
//! finite scores zero and stays in the batch.

mod composite;
mod focus;
mod validation;

pub use composite::{CompositeConfig, composite_rank};
pub use focus::{
    DEFAULT_PE_RANK, FOCUS_WEIGHTS, MISSING_PEG, VALUATION_CAP, focus_score, focus_valuation,
};
pub use validation::{DEFAULT_DEBT_RANK, validation_score, validation_valuation};

use crate::error::ScoreError;
use crate::metric::Metric;
use crate::normalize::NormalizedRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scores are clamped to this closed range.
pub const SCORE_RANGE: (f64, f64) = (0.0, 100.0);

/// Configuration for scoring a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weights of the cash-margin and turnover composite
    pub composite: CompositeConfig,
}

/// A normalized record with its scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// Record and its ranks
    pub normalized: NormalizedRecord,
    /// Focus score in [0, 100]
    pub focus_score: f64,
    /// Validation score in [0, 100]
    pub validation_score: f64,
    /// Cash-margin and turnover rank blend; `None` when either rank is missing
    pub composite: Option<f64>,
}

impl ScoredRecord {
    /// Instrument identifier.
    pub fn symbol(&self) -> &str {
        &self.normalized.record.symbol
    }

    /// Rank for a metric, if one was computed.
    pub fn rank(&self, metric: Metric) -> Option<f64> {
        self.normalized.rank(metric)
    }

    /// Raw value of a metric.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.normalized.value(metric)
    }
}

/// Score every record. Output order matches input order.
pub fn score_all(records: Vec<NormalizedRecord>, config: &ScoringConfig) -> Vec<ScoredRecord> {
    records
        .into_iter()
        .map(|normalized| {
            let focus = fail_soft(&normalized, "focus", focus_score(&normalized));
            let validation = fail_soft(&normalized, "validation", validation_score(&normalized));
            let composite = composite_rank(&normalized, &config.composite);
            ScoredRecord {
                normalized,
                focus_score: focus,
                validation_score: validation,
                composite,
            }
        })
        .collect()
}

fn fail_soft(record: &NormalizedRecord, score: &str, result: Result<f64, ScoreError>) -> f64 {
    result.unwrap_or_else(|error| {
        debug!(symbol = %record.record.symbol, score, %error, "row scored as zero");
        0.0
    })
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(SCORE_RANGE.0, SCORE_RANGE.1)
}

/// Rank for `metric`, or `default` when absent. Non-finite ranks are errors.
pub(crate) fn rank_or(
    record: &NormalizedRecord,
    metric: Metric,
    default: f64,
) -> Result<f64, ScoreError> {
    match record.rank(metric) {
        Some(value) if !value.is_finite() => Err(ScoreError::NonFiniteRank { metric, value }),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Raw value of `metric`, if present. Infinite values are errors.
pub(crate) fn finite_value(
    record: &NormalizedRecord,
    metric: Metric,
) -> Result<Option<f64>, ScoreError> {
    match record.value(metric) {
        Some(value) if !value.is_finite() => Err(ScoreError::NonFiniteValue { metric, value }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::IndustryRanks;
    use kestrel_data::RawRecord;

    fn with_ranks(ranks: &[(Metric, f64)]) -> NormalizedRecord {
        let mut industry = IndustryRanks::default();
        for &(metric, rank) in ranks {
            industry.insert(metric, rank);
        }
        NormalizedRecord {
            record: RawRecord::new("600000"),
            ranks: industry,
        }
    }

    #[test]
    fn test_score_all_fail_soft() {
        let records = vec![
            with_ranks(&[(Metric::FcfMargin, f64::NAN), (Metric::AssetTurnover, 80.0)]),
            with_ranks(&[(Metric::FcfMargin, 100.0), (Metric::AssetTurnover, 100.0)]),
        ];
        let scored = score_all(records, &ScoringConfig::default());

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].focus_score, 0.0);
        assert!(scored[1].focus_score > 70.0);
        assert_eq!(scored[1].composite, Some(100.0));
    }

    #[test]
    fn test_score_all_empty_ranks_stay_in_range() {
        let scored = score_all(vec![with_ranks(&[])], &ScoringConfig::default());
        let row = &scored[0];
        assert!((0.0..=100.0).contains(&row.focus_score));
        assert!((0.0..=100.0).contains(&row.validation_score));
        assert_eq!(row.composite, None);
    }

    #[test]
    fn test_rank_or_default_and_error() {
        let record = with_ranks(&[(Metric::Peg, f64::INFINITY)]);
        assert_eq!(rank_or(&record, Metric::PriceEarnings, 50.0), Ok(50.0));
        assert!(matches!(
            rank_or(&record, Metric::Peg, 0.0),
            Err(ScoreError::NonFiniteRank { metric: Metric::Peg, .. })
        ));
    }
}
