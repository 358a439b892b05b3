//! Screening Filter
//!
//! Keeps scored records that clear every score and fundamental threshold and
//! orders them by focus score, then composite, both descending. Ties on both
//! keys keep their input order.

use crate::rationale::rationale;
use kestrel_factors::{Metric, ScoredRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

/// Thresholds a record must clear to be shortlisted.
///
/// Score thresholds are inclusive; fundamental thresholds are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Minimum focus score (default: 70)
    pub min_focus_score: f64,
    /// Minimum cash-margin and turnover composite (default: 70)
    pub min_composite: f64,
    /// Minimum validation score (default: 60)
    pub min_validation_score: f64,
    /// Market cap must exceed this, in CNY (default: 5e9)
    pub min_market_cap: f64,
    /// Free-cash-flow margin must exceed this (default: 0.05)
    pub min_fcf_margin: f64,
    /// Asset turnover must exceed this (default: 0.2)
    pub min_asset_turnover: f64,
    /// Net income growth must exceed this (default: 0)
    pub min_net_income_growth: f64,
    /// Revenue growth must exceed this (default: 0)
    pub min_revenue_growth: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            min_focus_score: 70.0,
            min_composite: 70.0,
            min_validation_score: 60.0,
            min_market_cap: 5e9,
            min_fcf_margin: 0.05,
            min_asset_turnover: 0.2,
            min_net_income_growth: 0.0,
            min_revenue_growth: 0.0,
        }
    }
}

impl ScreeningConfig {
    /// True when the record clears every threshold. Missing values never pass.
    pub fn passes(&self, record: &ScoredRecord) -> bool {
        let above = |value: Option<f64>, floor: f64| value.is_some_and(|v| v > floor);

        record.focus_score >= self.min_focus_score
            && record.composite.is_some_and(|c| c >= self.min_composite)
            && record.validation_score >= self.min_validation_score
            && above(record.normalized.record.market_cap, self.min_market_cap)
            && above(record.value(Metric::FcfMargin), self.min_fcf_margin)
            && above(record.value(Metric::AssetTurnover), self.min_asset_turnover)
            && above(record.value(Metric::NetIncomeGrowth), self.min_net_income_growth)
            && above(record.value(Metric::RevenueGrowth), self.min_revenue_growth)
    }
}

/// A record that passed the filter, with its rationale label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistRecord {
    /// Scored record
    pub scored: ScoredRecord,
    /// Tags joined by `" | "`, or the baseline label
    pub rationale: String,
}

impl ShortlistRecord {
    /// Instrument identifier.
    pub fn symbol(&self) -> &str {
        self.scored.symbol()
    }
}

/// Records passing `config`, sorted by focus score then composite, descending.
pub fn filter_candidates(records: Vec<ScoredRecord>, config: &ScreeningConfig) -> Vec<ScoredRecord> {
    let total = records.len();
    let mut passed: Vec<ScoredRecord> = records.into_iter().filter(|r| config.passes(r)).collect();
    passed.sort_by(descending);
    info!(total, passed = passed.len(), "screening filter applied");
    passed
}

/// Filter, sort and tag. An empty shortlist is a valid result.
pub fn screen(records: Vec<ScoredRecord>, config: &ScreeningConfig) -> Vec<ShortlistRecord> {
    filter_candidates(records, config)
        .into_iter()
        .map(|scored| {
            let rationale = rationale(&scored);
            ShortlistRecord { scored, rationale }
        })
        .collect()
}

fn descending(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    let composite = |r: &ScoredRecord| r.composite.unwrap_or(f64::NEG_INFINITY);
    b.focus_score
        .total_cmp(&a.focus_score)
        .then_with(|| composite(b).total_cmp(&composite(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_data::RawRecord;
    use kestrel_factors::{IndustryRanks, NormalizedRecord};
    use rstest::rstest;

    fn passing(symbol: &str, focus: f64, composite: f64) -> ScoredRecord {
        ScoredRecord {
            normalized: NormalizedRecord {
                record: RawRecord {
                    market_cap: Some(1e10),
                    fcf_margin: Some(0.12),
                    asset_turnover: Some(0.6),
                    net_income_growth: Some(0.15),
                    revenue_growth: Some(0.08),
                    ..RawRecord::new(symbol)
                },
                ranks: IndustryRanks::default(),
            },
            focus_score: focus,
            validation_score: 65.0,
            composite: Some(composite),
        }
    }

    #[test]
    fn test_passing_record() {
        assert!(ScreeningConfig::default().passes(&passing("600519", 80.0, 75.0)));
    }

    #[rstest]
    #[case::focus_below(|r: &mut ScoredRecord| r.focus_score = 69.99)]
    #[case::composite_missing(|r: &mut ScoredRecord| r.composite = None)]
    #[case::composite_below(|r: &mut ScoredRecord| r.composite = Some(69.0))]
    #[case::validation_below(|r: &mut ScoredRecord| r.validation_score = 59.9)]
    #[case::market_cap_at_floor(|r: &mut ScoredRecord| r.normalized.record.market_cap = Some(5e9))]
    #[case::fcf_at_floor(|r: &mut ScoredRecord| r.normalized.record.fcf_margin = Some(0.05))]
    #[case::turnover_low(|r: &mut ScoredRecord| r.normalized.record.asset_turnover = Some(0.1))]
    #[case::ni_growth_negative(|r: &mut ScoredRecord| r.normalized.record.net_income_growth = Some(-0.01))]
    #[case::revenue_growth_zero(|r: &mut ScoredRecord| r.normalized.record.revenue_growth = Some(0.0))]
    #[case::revenue_growth_missing(|r: &mut ScoredRecord| r.normalized.record.revenue_growth = None)]
    fn test_single_failure_excludes(#[case] tweak: fn(&mut ScoredRecord)) {
        let mut record = passing("000858", 80.0, 75.0);
        tweak(&mut record);
        assert!(!ScreeningConfig::default().passes(&record));
    }

    #[test]
    fn test_inclusive_score_thresholds() {
        let mut record = passing("000858", 70.0, 70.0);
        record.validation_score = 60.0;
        assert!(ScreeningConfig::default().passes(&record));
    }

    #[test]
    fn test_sort_order_is_stable() {
        let records = vec![
            passing("A", 75.0, 72.0),
            passing("B", 90.0, 71.0),
            passing("C", 75.0, 80.0),
            passing("D", 75.0, 72.0),
        ];
        let sorted = filter_candidates(records, &ScreeningConfig::default());
        let symbols: Vec<_> = sorted.iter().map(ScoredRecord::symbol).collect();
        assert_eq!(symbols, ["B", "C", "A", "D"]);
    }

    #[test]
    fn test_repeated_runs_agree() {
        let records = vec![
            passing("A", 75.0, 72.0),
            passing("B", 60.0, 90.0),
            passing("C", 90.0, 71.0),
            passing("D", 75.0, 72.0),
        ];
        let config = ScreeningConfig::default();

        let first = filter_candidates(records.clone(), &config);
        let second = filter_candidates(records.clone(), &config);
        assert_eq!(first, second);
        assert_eq!(screen(records.clone(), &config), screen(records, &config));
    }

    #[test]
    fn test_empty_result() {
        let shortlist = screen(vec![passing("A", 10.0, 10.0)], &ScreeningConfig::default());
        assert!(shortlist.is_empty());
    }

    #[test]
    fn test_screen_attaches_rationale() {
        let shortlist = screen(vec![passing("A", 80.0, 85.0)], &ScreeningConfig::default());
        assert_eq!(shortlist[0].rationale, "现金流回报领先 | 稳健盈利增长");
    }
}
