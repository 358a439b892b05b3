//! Scanner query definition.

use crate::fundamentals::columns;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// `left == right`
    #[serde(rename = "equal")]
    Equal,
    /// `left > right`
    #[serde(rename = "greater")]
    Greater,
    /// `left >= right`
    #[serde(rename = "egreater")]
    GreaterOrEqual,
    /// `left < right`
    #[serde(rename = "less")]
    Less,
    /// `left <= right`
    #[serde(rename = "eless")]
    LessOrEqual,
}

/// A single `column <op> value` condition. Predicates are combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Column the predicate tests
    pub left: String,
    /// Comparison operator
    pub operation: Operation,
    /// Right-hand operand
    pub right: Value,
}

impl Predicate {
    /// Create a predicate.
    pub fn new(left: impl Into<String>, operation: Operation, right: impl Into<Value>) -> Self {
        Self {
            left: left.into(),
            operation,
            right: right.into(),
        }
    }
}

/// Scanner query: market, projection, predicate conjunction and row limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanQuery {
    /// Market to scan (e.g. `china`)
    pub market: String,
    /// Projected columns, in output order
    pub columns: Vec<String>,
    /// Predicates, all of which must hold
    pub predicates: Vec<Predicate>,
    /// Maximum number of rows returned
    pub limit: usize,
}

impl ScanQuery {
    /// Create an empty query for a market.
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            columns: Vec::new(),
            predicates: Vec::new(),
            limit: 50,
        }
    }

    /// Set the projected columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Set the row limit.
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Broad fundamentals universe: profitable stocks above a market cap floor.
    pub fn broad_universe(market: impl Into<String>, min_market_cap: f64, limit: usize) -> Self {
        Self::new(market)
            .select(DEFAULT_COLUMNS.iter().copied())
            .filter(Predicate::new(columns::TYPE, Operation::Equal, "stock"))
            .filter(Predicate::new(
                columns::MARKET_CAP,
                Operation::Greater,
                min_market_cap,
            ))
            .filter(Predicate::new(columns::TOTAL_REVENUE, Operation::Greater, 0))
            .filter(Predicate::new(columns::NET_INCOME, Operation::Greater, 0))
            .limit(limit)
    }
}

/// Columns projected by [`ScanQuery::broad_universe`].
pub const DEFAULT_COLUMNS: &[&str] = &[
    columns::NAME,
    columns::DESCRIPTION,
    columns::MARKET_CAP,
    columns::FCF_MARGIN,
    columns::ASSET_TURNOVER,
    columns::NET_INCOME,
    columns::OPERATING_MARGIN,
    columns::GROSS_MARGIN,
    columns::ROE,
    columns::ROA,
    columns::REVENUE_GROWTH,
    columns::NET_INCOME_GROWTH,
    columns::FCF_GROWTH,
    columns::DEBT_TO_EQUITY,
    columns::CURRENT_RATIO,
    columns::QUICK_RATIO,
    columns::PRICE_EARNINGS,
    columns::PRICE_BOOK,
    columns::PRICE_SALES,
    columns::PEG,
    columns::RECOMMEND_ALL,
    columns::RECOMMEND_ALL_1W,
    columns::RECOMMEND_MA,
    columns::RECOMMEND_MA_1W,
    columns::RECOMMEND_OTHER,
    columns::RECOMMEND_OTHER_1W,
    columns::SECTOR,
    columns::INDUSTRY,
    columns::EXCHANGE,
    columns::CLOSE,
    columns::VOLUME,
];
