//! Market scanner: query construction and data source clients.

pub mod query;
pub mod tradingview;

pub use query::{Operation, Predicate, ScanQuery};
pub use tradingview::TradingViewScanner;

use crate::error::Result;
use polars::prelude::DataFrame;
use std::future::Future;

/// Result of a scanner query.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Total number of rows matching the query upstream, before the limit.
    pub total_count: usize,
    /// Returned rows, one column per projected field plus `ticker`.
    pub table: DataFrame,
}

impl ScanResult {
    /// True when no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.table.height() == 0
    }
}

/// A source of cross-sectional fundamentals.
pub trait ScanProvider {
    /// Execute a query and return the matching table.
    ///
    /// An empty table is a valid answer.
    fn scan(&self, query: &ScanQuery) -> impl Future<Output = Result<ScanResult>> + Send;
}
