//! Validation score: profitability quality, balance-sheet health and
//! valuation as a second opinion on the focus score.

use super::focus::DEFAULT_PE_RANK;
use super::{clamp_score, finite_value, rank_or};
use crate::error::ScoreError;
use crate::metric::Metric;
use crate::normalize::NormalizedRecord;

/// Debt-to-equity rank assumed when none was computed.
pub const DEFAULT_DEBT_RANK: f64 = 50.0;

const QUALITY_METRICS: [Metric; 3] = [
    Metric::OperatingMargin,
    Metric::ReturnOnEquity,
    Metric::RevenueGrowth,
];
const QUALITY_WEIGHT: f64 = 0.6;
const HEALTH_WEIGHT: f64 = 0.2;
const VALUATION_WEIGHT: f64 = 0.2;

/// Validation score of a record, in [0, 100].
///
/// `0.6 * quality + 0.2 * (100 - debt rank) + 0.2 * valuation`, where quality
/// is the mean of the operating margin, ROE and revenue growth ranks with
/// missing ranks counted as zero.
pub fn validation_score(record: &NormalizedRecord) -> Result<f64, ScoreError> {
    let mut quality = 0.0;
    for metric in QUALITY_METRICS {
        quality += rank_or(record, metric, 0.0)?;
    }
    quality /= QUALITY_METRICS.len() as f64;

    let health = 100.0 - rank_or(record, Metric::DebtToEquity, DEFAULT_DEBT_RANK)?;
    let valuation = validation_valuation(record)?;

    Ok(clamp_score(
        quality * QUALITY_WEIGHT + health * HEALTH_WEIGHT + valuation * VALUATION_WEIGHT,
    ))
}

/// Valuation block of the validation score, before weighting.
///
/// Steps on the raw PEG when present: below 1 scores 100, below 1.5 scores
/// 80, below 2 scores 60, anything else 40. Otherwise the inverted P/E rank.
pub fn validation_valuation(record: &NormalizedRecord) -> Result<f64, ScoreError> {
    Ok(match finite_value(record, Metric::Peg)? {
        Some(peg) if peg < 1.0 => 100.0,
        Some(peg) if peg < 1.5 => 80.0,
        Some(peg) if peg < 2.0 => 60.0,
        Some(_) => 40.0,
        None => 100.0 - rank_or(record, Metric::PriceEarnings, DEFAULT_PE_RANK)?,
    })
}
