//! Market sentiment and attention data keyed by instrument code.

pub mod eastmoney;

pub use eastmoney::EastmoneyCommentProvider;

use crate::cache::SnapshotCache;
use crate::error::{DataError, Result};
use crate::fundamentals::{f64_values, str_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::info;

/// Snapshot column names.
pub mod columns {
    /// Instrument code (join key).
    pub const CODE: &str = "code";
    /// Short name.
    pub const NAME: &str = "name";
    /// Latest price.
    pub const LATEST_PRICE: &str = "latest_price";
    /// Daily change, percent.
    pub const CHANGE_PCT: &str = "change_pct";
    /// Turnover rate, percent.
    pub const TURNOVER_RATE: &str = "turnover_rate";
    /// Dynamic P/E.
    pub const PE_DYNAMIC: &str = "pe_dynamic";
    /// Main-force cost basis.
    pub const MAIN_COST: &str = "main_cost";
    /// Institutional participation.
    pub const INSTITUTION_PARTICIPATION: &str = "institution_participation";
    /// Composite commentary score.
    pub const COMPOSITE_SCORE: &str = "composite_score";
    /// Rank change since the previous session.
    pub const RANK_CHANGE: &str = "rank_change";
    /// Current rank.
    pub const CURRENT_RANK: &str = "current_rank";
    /// Attention index.
    pub const ATTENTION_INDEX: &str = "attention_index";
    /// Trade date.
    pub const TRADE_DATE: &str = "trade_date";
}

/// Sentiment and attention metrics for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Instrument code
    pub code: String,
    /// Short name
    pub name: Option<String>,
    /// Latest price
    pub latest_price: Option<f64>,
    /// Daily change, percent
    pub change_pct: Option<f64>,
    /// Turnover rate, percent
    pub turnover_rate: Option<f64>,
    /// Dynamic P/E
    pub pe_dynamic: Option<f64>,
    /// Main-force cost basis
    pub main_cost: Option<f64>,
    /// Institutional participation
    pub institution_participation: Option<f64>,
    /// Composite commentary score
    pub composite_score: Option<f64>,
    /// Rank change since the previous session
    pub rank_change: Option<f64>,
    /// Current rank
    pub current_rank: Option<f64>,
    /// Attention index
    pub attention_index: Option<f64>,
    /// Trade date
    pub trade_date: Option<String>,
}

impl SentimentRecord {
    /// Create an empty record for a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Build a columnar snapshot.
    pub fn to_dataframe(records: &[Self]) -> Result<DataFrame> {
        let num = |f: fn(&Self) -> Option<f64>| -> Vec<Option<f64>> { records.iter().map(f).collect() };

        let df = DataFrame::new(vec![
            Column::new(
                columns::CODE.into(),
                records.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                columns::NAME.into(),
                records.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
            ),
            Column::new(columns::LATEST_PRICE.into(), num(|r| r.latest_price)),
            Column::new(columns::CHANGE_PCT.into(), num(|r| r.change_pct)),
            Column::new(columns::TURNOVER_RATE.into(), num(|r| r.turnover_rate)),
            Column::new(columns::PE_DYNAMIC.into(), num(|r| r.pe_dynamic)),
            Column::new(columns::MAIN_COST.into(), num(|r| r.main_cost)),
            Column::new(
                columns::INSTITUTION_PARTICIPATION.into(),
                num(|r| r.institution_participation),
            ),
            Column::new(columns::COMPOSITE_SCORE.into(), num(|r| r.composite_score)),
            Column::new(columns::RANK_CHANGE.into(), num(|r| r.rank_change)),
            Column::new(columns::CURRENT_RANK.into(), num(|r| r.current_rank)),
            Column::new(columns::ATTENTION_INDEX.into(), num(|r| r.attention_index)),
            Column::new(
                columns::TRADE_DATE.into(),
                records.iter().map(|r| r.trade_date.clone()).collect::<Vec<_>>(),
            ),
        ])?;

        Ok(df)
    }

    /// Decode a columnar snapshot. Only `code` is required.
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>> {
        let codes = str_values(df, columns::CODE)?
            .ok_or_else(|| DataError::MissingColumn(columns::CODE.to_string()))?;
        let height = df.height();
        let text = |name: &str| -> Result<Vec<Option<String>>> {
            Ok(str_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };
        let num = |name: &str| -> Result<Vec<Option<f64>>> {
            Ok(f64_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };

        let name = text(columns::NAME)?;
        let latest_price = num(columns::LATEST_PRICE)?;
        let change_pct = num(columns::CHANGE_PCT)?;
        let turnover_rate = num(columns::TURNOVER_RATE)?;
        let pe_dynamic = num(columns::PE_DYNAMIC)?;
        let main_cost = num(columns::MAIN_COST)?;
        let institution_participation = num(columns::INSTITUTION_PARTICIPATION)?;
        let composite_score = num(columns::COMPOSITE_SCORE)?;
        let rank_change = num(columns::RANK_CHANGE)?;
        let current_rank = num(columns::CURRENT_RANK)?;
        let attention_index = num(columns::ATTENTION_INDEX)?;
        let trade_date = text(columns::TRADE_DATE)?;

        codes
            .into_iter()
            .enumerate()
            .map(|(i, code)| {
                let code = code.ok_or_else(|| {
                    DataError::Parse(format!("snapshot row {i} has no {}", columns::CODE))
                })?;
                Ok(Self {
                    code,
                    name: name[i].clone(),
                    latest_price: latest_price[i],
                    change_pct: change_pct[i],
                    turnover_rate: turnover_rate[i],
                    pe_dynamic: pe_dynamic[i],
                    main_cost: main_cost[i],
                    institution_participation: institution_participation[i],
                    composite_score: composite_score[i],
                    rank_change: rank_change[i],
                    current_rank: current_rank[i],
                    attention_index: attention_index[i],
                    trade_date: trade_date[i].clone(),
                })
            })
            .collect()
    }
}

/// A source of sentiment records.
pub trait SentimentProvider {
    /// Fetch the full current dataset.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<SentimentRecord>>> + Send;
}

/// Sort by current rank, unranked rows last. Stable for equal ranks.
pub fn sort_by_rank(records: &mut [SentimentRecord]) {
    records.sort_by(|a, b| match (a.current_rank, b.current_rank) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Return the latest cached snapshot, fetching and caching a new one when the
/// cache is empty or `force_refresh` is set.
///
/// `timestamp` names a newly written snapshot (`YYYYMMDD_HHMMSS`).
pub async fn latest_snapshot<P: SentimentProvider>(
    cache: &SnapshotCache,
    provider: &P,
    force_refresh: bool,
    timestamp: &str,
) -> Result<Vec<SentimentRecord>> {
    if !force_refresh && let Some(path) = cache.latest()? {
        let records = SentimentRecord::from_dataframe(&cache.read(&path)?)?;
        info!(path = %path.display(), rows = records.len(), "loaded cached sentiment snapshot");
        return Ok(records);
    }

    info!(force_refresh, "fetching fresh sentiment snapshot");
    let mut records = provider.fetch_all().await?;
    sort_by_rank(&mut records);
    let mut df = SentimentRecord::to_dataframe(&records)?;
    let path = cache.write(&mut df, timestamp)?;
    info!(path = %path.display(), rows = records.len(), "saved sentiment snapshot");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, rank: Option<f64>) -> SentimentRecord {
        SentimentRecord {
            name: Some(format!("name-{code}")),
            current_rank: rank,
            attention_index: Some(88.5),
            trade_date: Some("2024-06-28".to_string()),
            ..SentimentRecord::new(code)
        }
    }

    #[test]
    fn test_dataframe_round_trip() {
        let records = vec![record("600519", Some(3.0)), record("000858", None)];
        let df = SentimentRecord::to_dataframe(&records).unwrap();
        assert_eq!(df.height(), 2);
        let decoded = SentimentRecord::from_dataframe(&df).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_sort_by_rank_puts_unranked_last() {
        let mut records = vec![
            record("a", None),
            record("b", Some(20.0)),
            record("c", Some(1.0)),
        ];
        sort_by_rank(&mut records);
        let codes: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["c", "b", "a"]);
    }
}
