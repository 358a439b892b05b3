//! TradingView screener client.

use super::{ScanProvider, ScanQuery, ScanResult};
use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://scanner.tradingview.com";
const PROVIDER: &str = "TradingView";

/// Request body accepted by the `/{market}/scan` endpoint.
#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    markets: [&'a str; 1],
    columns: &'a [String],
    filter: &'a [super::Predicate],
    range: [usize; 2],
    options: ScanOptions,
}

#[derive(Debug, Serialize)]
struct ScanOptions {
    lang: &'static str,
}

/// Raw `/scan` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    /// Rows matching upstream before the range is applied
    #[serde(rename = "totalCount", default)]
    pub total_count: usize,
    /// Returned rows
    #[serde(default)]
    pub data: Option<Vec<ScanRow>>,
    /// Error message, set when the query was rejected
    #[serde(default)]
    pub error: Option<String>,
}

/// A single scanner row: exchange-qualified ticker plus projected values.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    /// Exchange-qualified ticker, e.g. `SSE:600519`
    pub s: String,
    /// Values in projection order
    pub d: Vec<Value>,
}

/// TradingView scanner HTTP client.
#[derive(Debug, Clone)]
pub struct TradingViewScanner {
    client: reqwest::Client,
    base_url: String,
}

impl TradingViewScanner {
    /// Create a client against the public scanner endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, market: &str) -> String {
        format!("{}/{}/scan", self.base_url.trim_end_matches('/'), market)
    }
}

impl ScanProvider for TradingViewScanner {
    async fn scan(&self, query: &ScanQuery) -> Result<ScanResult> {
        let body = ScanRequest {
            markets: [query.market.as_str()],
            columns: &query.columns,
            filter: &query.predicates,
            range: [0, query.limit],
            options: ScanOptions { lang: "en" },
        };

        let url = self.endpoint(&query.market);
        debug!(%url, columns = query.columns.len(), limit = query.limit, "scanner request");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload: ScanResponse = response.json().await?;
        if !status.is_success() && payload.error.is_none() {
            return Err(DataError::Api {
                provider: PROVIDER,
                message: format!("HTTP {status}"),
            });
        }

        let result = decode_response(&query.columns, payload)?;
        info!(
            market = %query.market,
            rows = result.table.height(),
            total = result.total_count,
            "scanner query complete"
        );
        Ok(result)
    }
}

/// Decode a scanner response into a table.
///
/// Adds a `ticker` column holding the exchange-qualified symbol. A projected
/// column whose non-null values are all numbers becomes `Float64`; anything
/// else becomes `String`.
pub fn decode_response(columns: &[String], response: ScanResponse) -> Result<ScanResult> {
    if let Some(message) = response.error {
        return Err(DataError::Api {
            provider: PROVIDER,
            message,
        });
    }
    let rows = response.data.unwrap_or_default();

    for row in &rows {
        if row.d.len() != columns.len() {
            return Err(DataError::Parse(format!(
                "row {} has {} values, expected {}",
                row.s,
                row.d.len(),
                columns.len()
            )));
        }
    }

    let mut frame_columns = Vec::with_capacity(columns.len() + 1);
    let tickers: Vec<&str> = rows.iter().map(|r| r.s.as_str()).collect();
    frame_columns.push(Column::new("ticker".into(), tickers));

    for (idx, name) in columns.iter().enumerate() {
        let values: Vec<&Value> = rows.iter().map(|r| &r.d[idx]).collect();
        let numeric = values.iter().all(|v| v.is_null() || v.is_number());
        let column = if numeric {
            let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
            Column::new(name.as_str().into(), data)
        } else {
            let data: Vec<Option<String>> = values
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name.as_str().into(), data)
        };
        frame_columns.push(column);
    }

    Ok(ScanResult {
        total_count: response.total_count,
        table: DataFrame::new(frame_columns)?,
    })
}
