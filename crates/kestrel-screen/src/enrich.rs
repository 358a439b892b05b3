//! Left join of the shortlist with sentiment records.

use crate::filter::ShortlistRecord;
use kestrel_data::SentimentRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A shortlisted record with its sentiment row, if one matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Shortlisted record
    pub shortlist: ShortlistRecord,
    /// Sentiment row keyed by the same code
    pub sentiment: Option<SentimentRecord>,
}

impl EnrichedRecord {
    /// Instrument identifier.
    pub fn symbol(&self) -> &str {
        self.shortlist.symbol()
    }
}

/// Attach sentiment to each shortlisted record by instrument code.
///
/// Every shortlisted record appears exactly once, in input order. When the
/// sentiment set repeats a code, the first occurrence wins.
pub fn join_sentiment(
    shortlist: Vec<ShortlistRecord>,
    sentiment: &[SentimentRecord],
) -> Vec<EnrichedRecord> {
    let mut by_code: HashMap<&str, &SentimentRecord> = HashMap::with_capacity(sentiment.len());
    for record in sentiment {
        by_code.entry(record.code.as_str()).or_insert(record);
    }

    let enriched: Vec<EnrichedRecord> = shortlist
        .into_iter()
        .map(|shortlist| {
            let sentiment = by_code.get(shortlist.symbol()).map(|s| (*s).clone());
            if sentiment.is_none() {
                debug!(symbol = shortlist.symbol(), "no sentiment row");
            }
            EnrichedRecord {
                shortlist,
                sentiment,
            }
        })
        .collect();

    let matched = enriched.iter().filter(|r| r.sentiment.is_some()).count();
    info!(rows = enriched.len(), matched, "sentiment joined");
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_data::RawRecord;
    use kestrel_factors::{IndustryRanks, NormalizedRecord, ScoredRecord};

    fn shortlisted(symbol: &str) -> ShortlistRecord {
        ShortlistRecord {
            scored: ScoredRecord {
                normalized: NormalizedRecord {
                    record: RawRecord::new(symbol),
                    ranks: IndustryRanks::default(),
                },
                focus_score: 75.0,
                validation_score: 65.0,
                composite: Some(72.0),
            },
            rationale: "符合基础标准".to_string(),
        }
    }

    fn sentiment(code: &str, rank: f64) -> SentimentRecord {
        SentimentRecord {
            current_rank: Some(rank),
            ..SentimentRecord::new(code)
        }
    }

    #[test]
    fn test_left_join_keeps_unmatched() {
        let enriched = join_sentiment(
            vec![shortlisted("600519"), shortlisted("000001")],
            &[sentiment("600519", 12.0), sentiment("300750", 3.0)],
        );

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].sentiment.as_ref().and_then(|s| s.current_rank), Some(12.0));
        assert_eq!(enriched[1].symbol(), "000001");
        assert!(enriched[1].sentiment.is_none());
    }

    #[test]
    fn test_duplicate_code_first_wins() {
        let enriched = join_sentiment(
            vec![shortlisted("600519")],
            &[sentiment("600519", 1.0), sentiment("600519", 2.0)],
        );
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].sentiment.as_ref().and_then(|s| s.current_rank), Some(1.0));
    }

    #[test]
    fn test_empty_sentiment() {
        let enriched = join_sentiment(vec![shortlisted("600519")], &[]);
        assert!(enriched[0].sentiment.is_none());
    }
}
