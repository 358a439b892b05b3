//! Cash-margin and turnover composite.

use crate::metric::Metric;
use crate::normalize::NormalizedRecord;
use serde::{Deserialize, Serialize};

/// Configuration for the composite rank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Weight for the free-cash-flow margin rank (default: 0.6)
    pub fcf_weight: f64,
    /// Weight for the asset turnover rank (default: 0.4)
    pub turnover_weight: f64,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            fcf_weight: 0.6,
            turnover_weight: 0.4,
        }
    }
}

/// Weighted blend of the cash-margin and turnover ranks.
///
/// `None` when either rank is missing; a missing rank is never treated as
/// zero here.
pub fn composite_rank(record: &NormalizedRecord, config: &CompositeConfig) -> Option<f64> {
    let fcf = record.rank(Metric::FcfMargin)?;
    let turnover = record.rank(Metric::AssetTurnover)?;
    Some(fcf * config.fcf_weight + turnover * config.turnover_weight)
}
