//! Eastmoney stock-comment client (千股千评).
//!
//! Pages through the datacenter report `RPT_DMSK_TS_STOCKNEW`, which carries
//! per-stock attention, main-force cost and institutional participation.

use super::{SentimentProvider, SentimentRecord};
use crate::error::{DataError, Result};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://datacenter-web.eastmoney.com/api/data/v1/get";
const REPORT_NAME: &str = "RPT_DMSK_TS_STOCKNEW";
const QUOTE_COLUMNS: &str = "f2~01~SECURITY_CODE~CLOSE_PRICE,f8~01~SECURITY_CODE~TURNOVERRATE,\
f3~01~SECURITY_CODE~CHANGE_RATE,f9~01~SECURITY_CODE~PE_DYNAMIC";
const PROVIDER: &str = "Eastmoney";

/// Datacenter envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    result: Option<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    pages: usize,
    #[serde(default)]
    data: Vec<CommentRow>,
}

/// One report row as published.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CommentRow {
    security_code: String,
    security_name_abbr: Option<String>,
    close_price: Option<f64>,
    change_rate: Option<f64>,
    turnoverrate: Option<f64>,
    pe_dynamic: Option<f64>,
    prime_cost: Option<f64>,
    org_participate: Option<f64>,
    totalscore: Option<f64>,
    rank_up: Option<f64>,
    rank: Option<f64>,
    focus: Option<f64>,
    trade_date: Option<String>,
}

impl From<CommentRow> for SentimentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            code: row.security_code,
            name: row.security_name_abbr,
            latest_price: row.close_price,
            change_pct: row.change_rate,
            turnover_rate: row.turnoverrate,
            pe_dynamic: row.pe_dynamic,
            main_cost: row.prime_cost,
            // Published as a fraction; reported in percent.
            institution_participation: row.org_participate.map(|v| v * 100.0),
            composite_score: row.totalscore,
            rank_change: row.rank_up,
            current_rank: row.rank,
            attention_index: row.focus,
            trade_date: row
                .trade_date
                .map(|d| d.split_whitespace().next().unwrap_or_default().to_string()),
        }
    }
}

/// Eastmoney stock-comment provider.
#[derive(Debug, Clone)]
pub struct EastmoneyCommentProvider {
    client: reqwest::Client,
    base_url: String,
    page_size: usize,
    page_delay: Duration,
}

impl EastmoneyCommentProvider {
    /// Create a provider against the public datacenter endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            page_size: 500,
            page_delay: Duration::from_millis(200),
        })
    }

    /// Set rows requested per page.
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the pause between page requests.
    pub const fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    async fn fetch_page(&self, page_number: usize) -> Result<Page> {
        let page_size = self.page_size.to_string();
        let page_number_str = page_number.to_string();
        let params = [
            ("sortColumns", "SECURITY_CODE"),
            ("sortTypes", "1"),
            ("pageSize", page_size.as_str()),
            ("pageNumber", page_number_str.as_str()),
            ("reportName", REPORT_NAME),
            ("columns", "ALL"),
            ("source", "WEB"),
            ("client", "WEB"),
            ("quoteColumns", QUOTE_COLUMNS),
        ];

        debug!(page_number, "sentiment page request");
        let envelope: Envelope = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.success {
            return Err(DataError::Api {
                provider: PROVIDER,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request rejected".to_string()),
            });
        }
        envelope
            .result
            .ok_or_else(|| DataError::Parse(format!("page {page_number} has no result")))
    }
}

impl SentimentProvider for EastmoneyCommentProvider {
    async fn fetch_all(&self) -> Result<Vec<SentimentRecord>> {
        let first = self.fetch_page(1).await?;
        let pages = first.pages.max(1);
        let mut records: Vec<SentimentRecord> =
            first.data.into_iter().map(SentimentRecord::from).collect();

        for page_number in 2..=pages {
            sleep(self.page_delay).await;
            let page = self.fetch_page(page_number).await?;
            records.extend(page.data.into_iter().map(SentimentRecord::from));
        }

        info!(pages, rows = records.len(), "sentiment dataset fetched");
        Ok(records)
    }
}
