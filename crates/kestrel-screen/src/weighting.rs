//! Portfolio Weighting
//!
//! Weights each shortlisted record by `score * ln(size)` and normalizes the
//! weights to sum to one. Size is the market cap in 亿 (1e8 CNY).

use crate::enrich::EnrichedRecord;
use crate::error::{Result, ScreenError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// CNY per 亿.
pub const MARKET_CAP_UNIT: f64 = 1e8;

/// An enriched record with its portfolio weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRecord {
    /// Enriched record
    pub enriched: EnrichedRecord,
    /// Market cap in 亿, as used for weighting
    pub size: f64,
    /// Portfolio weight in [0, 1]
    pub weight: f64,
}

impl WeightedRecord {
    /// Instrument identifier.
    pub fn symbol(&self) -> &str {
        self.enriched.symbol()
    }

    /// Focus score the weight was derived from.
    pub const fn focus_score(&self) -> f64 {
        self.enriched.shortlist.scored.focus_score
    }
}

/// Normalized `score * ln(size)` weights for `(symbol, score, size)` items.
///
/// Weights follow input order. Errors when a size is not a positive finite
/// number, when a raw weight is negative, or when the raw weights sum to zero.
/// Empty input yields no weights.
pub fn portfolio_weights(items: &[(&str, f64, f64)]) -> Result<Vec<f64>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mut raw = Vec::with_capacity(items.len());
    for &(symbol, score, size) in items {
        if !(size.is_finite() && size > 0.0) {
            return Err(ScreenError::NonPositiveSize {
                symbol: symbol.to_string(),
                size,
            });
        }
        let weight = score * size.ln();
        if weight < 0.0 {
            return Err(ScreenError::NegativeWeight {
                symbol: symbol.to_string(),
                weight,
            });
        }
        raw.push(weight);
    }

    let total: f64 = raw.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(ScreenError::ZeroTotalWeight { count: items.len() });
    }
    Ok(raw.into_iter().map(|w| w / total).collect())
}

/// Weight the enriched shortlist by focus score and market cap in 亿.
///
/// Neither the size nor the score is rounded before weighting, so weights can
/// differ around the fourth decimal from ones computed on the one-decimal
/// market cap and two-decimal score shown in reports.
///
/// Output is sorted by weight, descending; equal weights keep input order.
pub fn assign_weights(records: Vec<EnrichedRecord>) -> Result<Vec<WeightedRecord>> {
    let mut sizes = Vec::with_capacity(records.len());
    for record in &records {
        let market_cap = record
            .shortlist
            .scored
            .normalized
            .record
            .market_cap
            .ok_or_else(|| ScreenError::MissingMarketCap {
                symbol: record.symbol().to_string(),
            })?;
        sizes.push(market_cap / MARKET_CAP_UNIT);
    }

    let items: Vec<(&str, f64, f64)> = records
        .iter()
        .zip(&sizes)
        .map(|(r, &size)| (r.symbol(), r.shortlist.scored.focus_score, size))
        .collect();
    let weights = portfolio_weights(&items)?;

    let mut weighted: Vec<WeightedRecord> = records
        .into_iter()
        .zip(sizes)
        .zip(weights)
        .map(|((enriched, size), weight)| WeightedRecord {
            enriched,
            size,
            weight,
        })
        .collect();
    weighted.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    info!(positions = weighted.len(), "portfolio weights assigned");
    Ok(weighted)
}
