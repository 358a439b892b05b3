//! Focus score: cash margin and asset turnover, with quality, growth and
//! valuation checks.

use super::{clamp_score, finite_value, rank_or};
use crate::error::ScoreError;
use crate::metric::Metric;
use crate::normalize::NormalizedRecord;

/// Per-metric share of the focus score, as (metric, cap). A rank of 100
/// contributes exactly the cap.
pub const FOCUS_WEIGHTS: [(Metric, f64); 6] = [
    (Metric::FcfMargin, 35.0),
    (Metric::AssetTurnover, 35.0),
    (Metric::OperatingMargin, 10.0),
    (Metric::ReturnOnEquity, 5.0),
    (Metric::RevenueGrowth, 5.0),
    (Metric::NetIncomeGrowth, 5.0),
];

/// Cap of the valuation term.
pub const VALUATION_CAP: f64 = 5.0;

/// P/E rank assumed when none was computed.
pub const DEFAULT_PE_RANK: f64 = 50.0;

/// Raw PEG assumed when a PEG rank exists without a raw value.
pub const MISSING_PEG: f64 = 999.0;

/// Focus score of a record, in [0, 100].
///
/// Missing ranks contribute nothing. Errors when a rank or raw PEG is not
/// finite.
pub fn focus_score(record: &NormalizedRecord) -> Result<f64, ScoreError> {
    let mut score = 0.0;
    for (metric, cap) in FOCUS_WEIGHTS {
        let rank = rank_or(record, metric, 0.0)?;
        score += (rank * cap / 100.0).min(cap);
    }
    score += focus_valuation(record)?;
    Ok(clamp_score(score))
}

/// Valuation term of the focus score, in [0, 5].
///
/// With a PEG rank, steps on the raw PEG: below 1.5 scores 5, below 2 scores
/// 3, anything else 1. Without one, scales the inverted P/E rank.
pub fn focus_valuation(record: &NormalizedRecord) -> Result<f64, ScoreError> {
    if record.rank(Metric::Peg).is_none() {
        let pe_rank = rank_or(record, Metric::PriceEarnings, DEFAULT_PE_RANK)?;
        return Ok(((100.0 - pe_rank) * 0.05).clamp(0.0, VALUATION_CAP));
    }

    // Only presence of the rank matters; its value must still be finite.
    rank_or(record, Metric::Peg, 0.0)?;
    let peg = finite_value(record, Metric::Peg)?.unwrap_or(MISSING_PEG);
    Ok(if peg < 1.5 {
        VALUATION_CAP
    } else if peg < 2.0 {
        3.0
    } else {
        1.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::IndustryRanks;
    use approx::assert_relative_eq;
    use kestrel_data::RawRecord;
    use rstest::rstest;

    fn record(ranks: &[(Metric, f64)], peg: Option<f64>) -> NormalizedRecord {
        let mut industry = IndustryRanks::default();
        for &(metric, rank) in ranks {
            industry.insert(metric, rank);
        }
        NormalizedRecord {
            record: RawRecord {
                peg,
                ..RawRecord::new("000333")
            },
            ranks: industry,
        }
    }

    #[test]
    fn test_weights_sum_to_one_hundred() {
        let total: f64 = FOCUS_WEIGHTS.iter().map(|(_, cap)| cap).sum();
        assert_relative_eq!(total + VALUATION_CAP, 100.0);
    }

    #[test]
    fn test_perfect_ranks_score_one_hundred() {
        let mut ranks: Vec<(Metric, f64)> =
            FOCUS_WEIGHTS.iter().map(|&(metric, _)| (metric, 100.0)).collect();
        ranks.push((Metric::Peg, 10.0));
        let score = focus_score(&record(&ranks, Some(0.8))).unwrap();
        assert_relative_eq!(score, 100.0);
    }

    #[test]
    fn test_all_missing_uses_pe_default() {
        // Only the valuation term contributes: (100 - 50) * 0.05 = 2.5
        let score = focus_score(&record(&[], None)).unwrap();
        assert_relative_eq!(score, 2.5);
    }

    #[test]
    fn test_component_weights() {
        let score = focus_score(&record(
            &[
                (Metric::FcfMargin, 90.0),
                (Metric::AssetTurnover, 50.0),
                (Metric::OperatingMargin, 40.0),
                (Metric::PriceEarnings, 100.0),
            ],
            None,
        ))
        .unwrap();
        // 31.5 + 17.5 + 4.0 + 0.0
        assert_relative_eq!(score, 53.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(Some(0.8), 5.0)]
    #[case(Some(1.49), 5.0)]
    #[case(Some(1.5), 3.0)]
    #[case(Some(1.99), 3.0)]
    #[case(Some(2.0), 1.0)]
    #[case(Some(-3.0), 5.0)]
    #[case(None, 1.0)]
    fn test_valuation_with_peg_rank(#[case] peg: Option<f64>, #[case] expected: f64) {
        let row = record(&[(Metric::Peg, 1.0)], peg);
        assert_relative_eq!(focus_valuation(&row).unwrap(), expected);
    }

    #[rstest]
    #[case(0.0, 5.0)]
    #[case(40.0, 3.0)]
    #[case(100.0, 0.0)]
    fn test_valuation_from_pe_rank(#[case] pe_rank: f64, #[case] expected: f64) {
        // Raw PEG without a PEG rank is ignored.
        let row = record(&[(Metric::PriceEarnings, pe_rank)], Some(0.5));
        assert_relative_eq!(focus_valuation(&row).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_input_is_error() {
        let row = record(&[(Metric::AssetTurnover, f64::INFINITY)], None);
        assert!(focus_score(&row).is_err());

        let row = record(&[(Metric::Peg, 20.0)], Some(f64::INFINITY));
        assert_eq!(
            focus_score(&row),
            Err(ScoreError::NonFiniteValue {
                metric: Metric::Peg,
                value: f64::INFINITY
            })
        );
    }
}
