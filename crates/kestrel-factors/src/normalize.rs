//! Industry Rank Normalizer
//!
//! Converts absolute metric values into percentile ranks within each industry
//! group. A group with too few observations of a metric cannot support a
//! meaningful distribution, so its members are ranked against the whole
//! universe instead. The fallback is decided per (group, metric) pair.
//!
//! Ranks depend on the full snapshot. They are computed once per run and are
//! never updated incrementally.

use crate::metric::{GroupKey, Metric};
use kestrel_data::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Configuration for the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Metrics to rank (default: all of [`Metric::ALL`])
    pub metrics: Vec<Metric>,
    /// Column records are grouped by (default: sector)
    pub group_key: GroupKey,
    /// A group ranks on its own only with strictly more observations than this (default: 5)
    pub min_group_size: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            group_key: GroupKey::Sector,
            min_group_size: 5,
        }
    }
}

/// Percentile ranks in [0, 100] keyed by metric. Absent metrics have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryRanks(BTreeMap<Metric, f64>);

impl IndustryRanks {
    /// Rank for a metric, if one was computed.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    /// Set the rank for a metric.
    pub fn insert(&mut self, metric: Metric, rank: f64) {
        self.0.insert(metric, rank);
    }

    /// Iterate ranks in metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, r)| (*m, *r))
    }

    /// Number of ranked metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no metric was ranked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A record together with its industry-relative ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Source row
    pub record: RawRecord,
    /// Percentile ranks per metric
    pub ranks: IndustryRanks,
}

impl NormalizedRecord {
    /// Rank for a metric, if one was computed.
    pub fn rank(&self, metric: Metric) -> Option<f64> {
        self.ranks.get(metric)
    }

    /// Raw value of a metric.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        metric.value(&self.record)
    }
}

/// Inclusive percentile ranks, scaled to [0, 100].
///
/// Each present value receives `average_rank / n * 100`, where `n` counts the
/// present values and tied values share the mean of their ordinal ranks.
/// Absent values stay absent.
pub fn percentile_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut observed: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| !x.is_nan()).map(|x| (i, x)))
        .collect();
    observed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = observed.len() as f64;
    let mut ranks = vec![None; values.len()];
    let mut start = 0;
    while start < observed.len() {
        let mut end = start + 1;
        while end < observed.len() && observed[end].1 == observed[start].1 {
            end += 1;
        }
        // Ordinal ranks start+1..=end share their mean.
        let average = (start + 1 + end) as f64 / 2.0;
        let pct = average / n * 100.0;
        for &(i, _) in &observed[start..end] {
            ranks[i] = Some(pct);
        }
        start = end;
    }

    ranks
}

/// Attach industry-relative percentile ranks to every record.
///
/// For each metric and group, a group with more than
/// `config.min_group_size` present values is ranked within itself; otherwise
/// its members take their rank from the whole-universe distribution. Records
/// with no group label receive no ranks. Output order matches input order.
pub fn normalize(records: Vec<RawRecord>, config: &NormalizerConfig) -> Vec<NormalizedRecord> {
    let mut ranks = vec![IndustryRanks::default(); records.len()];

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(label) = config.group_key.label(record) {
            groups.entry(label).or_default().push(i);
        }
    }

    for &metric in &config.metrics {
        let values: Vec<Option<f64>> = records.iter().map(|r| metric.value(r)).collect();
        let universe = percentile_ranks(&values);

        for (group, members) in &groups {
            let group_values: Vec<Option<f64>> = members.iter().map(|&i| values[i]).collect();
            let observations = group_values.iter().flatten().count();

            if observations > config.min_group_size {
                let within = percentile_ranks(&group_values);
                for (&i, rank) in members.iter().zip(within) {
                    if let Some(rank) = rank {
                        ranks[i].insert(metric, rank);
                    }
                }
            } else {
                debug!(%metric, group, observations, "sparse group, ranking against universe");
                for &i in members {
                    if let Some(rank) = universe[i] {
                        ranks[i].insert(metric, rank);
                    }
                }
            }
        }
    }

    records
        .into_iter()
        .zip(ranks)
        .map(|(record, ranks)| NormalizedRecord { record, ranks })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(symbol: &str, sector: Option<&str>, fcf: Option<f64>) -> RawRecord {
        RawRecord {
            sector: sector.map(str::to_string),
            fcf_margin: fcf,
            ..RawRecord::new(symbol)
        }
    }

    fn fcf_only() -> NormalizerConfig {
        NormalizerConfig {
            metrics: vec![Metric::FcfMargin],
            ..NormalizerConfig::default()
        }
    }

    #[test]
    fn test_percentile_ranks_distinct() {
        let ranks = percentile_ranks(&[Some(3.0), Some(1.0), Some(2.0), Some(4.0)]);
        assert_eq!(ranks, vec![Some(75.0), Some(25.0), Some(50.0), Some(100.0)]);
    }

    #[test]
    fn test_percentile_ranks_ties_share_average() {
        let ranks = percentile_ranks(&[Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
        assert_relative_eq!(ranks[1].unwrap(), 62.5);
        assert_relative_eq!(ranks[2].unwrap(), 62.5);
        assert_relative_eq!(ranks[3].unwrap(), 100.0);
    }

    #[test]
    fn test_percentile_ranks_skip_absent() {
        let ranks = percentile_ranks(&[None, Some(5.0), Some(f64::NAN), Some(1.0)]);
        assert_eq!(ranks, vec![None, Some(100.0), None, Some(50.0)]);
    }

    #[test]
    fn test_percentile_ranks_empty() {
        assert!(percentile_ranks(&[]).is_empty());
        assert_eq!(percentile_ranks(&[None, None]), vec![None, None]);
    }

    #[test]
    fn test_large_group_ranks_within_itself() {
        // Ten-member group: 9 is the 90th percentile, 1 the 10th.
        let mut records: Vec<RawRecord> = (1..=10)
            .map(|v| record(&format!("T{v}"), Some("Tech"), Some(v as f64)))
            .collect();
        // A much larger outsider must not affect the group's ranks.
        records.extend((1..=6).map(|v| record(&format!("F{v}"), Some("Finance"), Some(100.0 * v as f64))));

        let normalized = normalize(records, &fcf_only());
        assert_relative_eq!(normalized[8].rank(Metric::FcfMargin).unwrap(), 90.0);
        assert_relative_eq!(normalized[0].rank(Metric::FcfMargin).unwrap(), 10.0);
        assert_relative_eq!(normalized[15].rank(Metric::FcfMargin).unwrap(), 100.0);
    }

    #[test]
    fn test_sparse_group_falls_back_to_universe() {
        let mut records: Vec<RawRecord> = (1..=6)
            .map(|v| record(&format!("T{v}"), Some("Tech"), Some(v as f64)))
            .collect();
        records.push(record("U1", Some("Utilities"), Some(3.5)));
        records.push(record("U2", Some("Utilities"), Some(10.0)));

        let normalized = normalize(records.clone(), &fcf_only());

        let values: Vec<Option<f64>> = records.iter().map(|r| r.fcf_margin).collect();
        let universe = percentile_ranks(&values);
        assert_eq!(normalized[6].rank(Metric::FcfMargin), universe[6]);
        assert_eq!(normalized[7].rank(Metric::FcfMargin), universe[7]);
        assert_relative_eq!(normalized[7].rank(Metric::FcfMargin).unwrap(), 100.0);
    }

    #[test]
    fn test_exactly_five_observations_is_sparse() {
        let mut records: Vec<RawRecord> = (1..=5)
            .map(|v| record(&format!("E{v}"), Some("Energy"), Some(v as f64)))
            .collect();
        // Nulls in the group do not count as observations.
        records.push(record("E6", Some("Energy"), None));
        records.push(record("X1", Some("Other"), Some(0.0)));

        let normalized = normalize(records, &fcf_only());
        // Universe has 6 values; 5.0 is the largest.
        assert_relative_eq!(normalized[4].rank(Metric::FcfMargin).unwrap(), 100.0);
        assert_relative_eq!(normalized[0].rank(Metric::FcfMargin).unwrap(), 2.0 / 6.0 * 100.0);
        assert_eq!(normalized[5].rank(Metric::FcfMargin), None);
    }

    #[test]
    fn test_missing_group_gets_no_rank() {
        let records = vec![
            record("A", None, Some(1.0)),
            record("B", Some("Tech"), Some(2.0)),
        ];
        let normalized = normalize(records, &fcf_only());
        assert!(normalized[0].ranks.is_empty());
        assert!(normalized[1].rank(Metric::FcfMargin).is_some());
    }

    #[test]
    fn test_industry_group_key() {
        let records: Vec<RawRecord> = (1..=6)
            .map(|v| RawRecord {
                industry: Some("Semiconductors".to_string()),
                fcf_margin: Some(v as f64),
                ..RawRecord::new(format!("S{v}"))
            })
            .collect();
        let config = NormalizerConfig {
            group_key: GroupKey::Industry,
            ..fcf_only()
        };
        let normalized = normalize(records, &config);
        assert_relative_eq!(normalized[5].rank(Metric::FcfMargin).unwrap(), 100.0);
    }

    #[test]
    fn test_preserves_input_order() {
        let records = vec![
            record("Z", Some("Tech"), Some(1.0)),
            record("A", Some("Tech"), Some(2.0)),
        ];
        let normalized = normalize(records, &fcf_only());
        let symbols: Vec<_> = normalized.iter().map(|n| n.record.symbol.as_str()).collect();
        assert_eq!(symbols, ["Z", "A"]);
    }
}
