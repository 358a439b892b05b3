//! Typed fundamental rows decoded from a scanner table.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Scanner column names.
pub mod columns {
    /// Instrument code (the unique key).
    pub const NAME: &str = "name";
    /// Company description.
    pub const DESCRIPTION: &str = "description";
    /// Market capitalization.
    pub const MARKET_CAP: &str = "market_cap_basic";
    /// Free cash flow margin (TTM).
    pub const FCF_MARGIN: &str = "free_cash_flow_margin_ttm";
    /// Current asset turnover.
    pub const ASSET_TURNOVER: &str = "asset_turnover_current";
    /// Net income (TTM).
    pub const NET_INCOME: &str = "net_income_ttm";
    /// Operating margin.
    pub const OPERATING_MARGIN: &str = "operating_margin";
    /// Gross margin.
    pub const GROSS_MARGIN: &str = "gross_margin";
    /// Return on equity.
    pub const ROE: &str = "return_on_equity";
    /// Return on assets.
    pub const ROA: &str = "return_on_assets";
    /// Revenue year-over-year growth (TTM).
    pub const REVENUE_GROWTH: &str = "total_revenue_yoy_growth_ttm";
    /// Net income year-over-year growth (TTM).
    pub const NET_INCOME_GROWTH: &str = "net_income_yoy_growth_ttm";
    /// Free cash flow year-over-year growth (TTM).
    pub const FCF_GROWTH: &str = "free_cash_flow_yoy_growth_ttm";
    /// Debt to equity.
    pub const DEBT_TO_EQUITY: &str = "debt_to_equity";
    /// Current ratio.
    pub const CURRENT_RATIO: &str = "current_ratio";
    /// Quick ratio.
    pub const QUICK_RATIO: &str = "quick_ratio";
    /// Price to earnings (TTM).
    pub const PRICE_EARNINGS: &str = "price_earnings_ttm";
    /// Price to book.
    pub const PRICE_BOOK: &str = "price_book_ratio";
    /// Price to sales.
    pub const PRICE_SALES: &str = "price_sales_ratio";
    /// Price/earnings to growth (TTM).
    pub const PEG: &str = "price_earnings_growth_ttm";
    /// Overall technical rating, daily.
    pub const RECOMMEND_ALL: &str = "Recommend.All";
    /// Overall technical rating, weekly.
    pub const RECOMMEND_ALL_1W: &str = "Recommend.All|1W";
    /// Moving-average rating, daily.
    pub const RECOMMEND_MA: &str = "Recommend.MA";
    /// Moving-average rating, weekly.
    pub const RECOMMEND_MA_1W: &str = "Recommend.MA|1W";
    /// Oscillator rating, daily.
    pub const RECOMMEND_OTHER: &str = "Recommend.Other";
    /// Oscillator rating, weekly.
    pub const RECOMMEND_OTHER_1W: &str = "Recommend.Other|1W";
    /// Sector classification.
    pub const SECTOR: &str = "sector";
    /// Industry classification.
    pub const INDUSTRY: &str = "industry";
    /// Listing exchange.
    pub const EXCHANGE: &str = "exchange";
    /// Last close.
    pub const CLOSE: &str = "close";
    /// Volume.
    pub const VOLUME: &str = "volume";
    /// Instrument type (filter only).
    pub const TYPE: &str = "type";
    /// Total revenue (filter only).
    pub const TOTAL_REVENUE: &str = "total_revenue_ttm";
}

/// Technical ratings published alongside fundamentals, in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalRatings {
    /// Overall rating, daily
    pub all: Option<f64>,
    /// Overall rating, weekly
    pub all_weekly: Option<f64>,
    /// Moving-average rating, daily
    pub moving_averages: Option<f64>,
    /// Moving-average rating, weekly
    pub moving_averages_weekly: Option<f64>,
    /// Oscillator rating, daily
    pub oscillators: Option<f64>,
    /// Oscillator rating, weekly
    pub oscillators_weekly: Option<f64>,
}

/// One instrument of the screening universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Instrument code, unique within a snapshot
    pub symbol: String,
    /// Company description
    pub description: Option<String>,
    /// Sector classification
    pub sector: Option<String>,
    /// Industry classification
    pub industry: Option<String>,
    /// Listing exchange
    pub exchange: Option<String>,
    /// Last close
    pub close: Option<f64>,
    /// Volume
    pub volume: Option<f64>,
    /// Market capitalization (CNY)
    pub market_cap: Option<f64>,

    /// Free cash flow margin (TTM)
    pub fcf_margin: Option<f64>,
    /// Current asset turnover
    pub asset_turnover: Option<f64>,
    /// Net income (TTM)
    pub net_income: Option<f64>,
    /// Operating margin
    pub operating_margin: Option<f64>,
    /// Gross margin
    pub gross_margin: Option<f64>,
    /// Return on equity
    pub return_on_equity: Option<f64>,
    /// Return on assets
    pub return_on_assets: Option<f64>,
    /// Revenue growth year-over-year
    pub revenue_growth: Option<f64>,
    /// Net income growth year-over-year
    pub net_income_growth: Option<f64>,
    /// Free cash flow growth year-over-year
    pub fcf_growth: Option<f64>,
    /// Debt to equity
    pub debt_to_equity: Option<f64>,
    /// Current ratio
    pub current_ratio: Option<f64>,
    /// Quick ratio
    pub quick_ratio: Option<f64>,
    /// Price to earnings
    pub price_earnings: Option<f64>,
    /// Price to book
    pub price_book: Option<f64>,
    /// Price to sales
    pub price_sales: Option<f64>,
    /// Price/earnings to growth
    pub peg: Option<f64>,

    /// Technical ratings
    pub ratings: TechnicalRatings,
}

impl RawRecord {
    /// Create an empty record for a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Decode scanner rows into records.
    ///
    /// The `name` column is required. Any other missing column decodes as
    /// absent values so a narrower projection still yields usable rows.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let symbols = str_values(df, columns::NAME)?
            .ok_or_else(|| DataError::MissingColumn(columns::NAME.to_string()))?;
        let height = df.height();

        let text = |name: &str| -> Result<Vec<Option<String>>> {
            Ok(str_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };
        let num = |name: &str| -> Result<Vec<Option<f64>>> {
            Ok(f64_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };

        let description = text(columns::DESCRIPTION)?;
        let sector = text(columns::SECTOR)?;
        let industry = text(columns::INDUSTRY)?;
        let exchange = text(columns::EXCHANGE)?;
        let close = num(columns::CLOSE)?;
        let volume = num(columns::VOLUME)?;
        let market_cap = num(columns::MARKET_CAP)?;
        let fcf_margin = num(columns::FCF_MARGIN)?;
        let asset_turnover = num(columns::ASSET_TURNOVER)?;
        let net_income = num(columns::NET_INCOME)?;
        let operating_margin = num(columns::OPERATING_MARGIN)?;
        let gross_margin = num(columns::GROSS_MARGIN)?;
        let return_on_equity = num(columns::ROE)?;
        let return_on_assets = num(columns::ROA)?;
        let revenue_growth = num(columns::REVENUE_GROWTH)?;
        let net_income_growth = num(columns::NET_INCOME_GROWTH)?;
        let fcf_growth = num(columns::FCF_GROWTH)?;
        let debt_to_equity = num(columns::DEBT_TO_EQUITY)?;
        let current_ratio = num(columns::CURRENT_RATIO)?;
        let quick_ratio = num(columns::QUICK_RATIO)?;
        let price_earnings = num(columns::PRICE_EARNINGS)?;
        let price_book = num(columns::PRICE_BOOK)?;
        let price_sales = num(columns::PRICE_SALES)?;
        let peg = num(columns::PEG)?;
        let all = num(columns::RECOMMEND_ALL)?;
        let all_weekly = num(columns::RECOMMEND_ALL_1W)?;
        let ma = num(columns::RECOMMEND_MA)?;
        let ma_weekly = num(columns::RECOMMEND_MA_1W)?;
        let other = num(columns::RECOMMEND_OTHER)?;
        let other_weekly = num(columns::RECOMMEND_OTHER_1W)?;

        let mut records = Vec::with_capacity(height);
        for (i, symbol) in symbols.into_iter().enumerate() {
            let Some(symbol) = symbol else {
                return Err(DataError::Parse(format!("row {i} has no {}", columns::NAME)));
            };
            records.push(Self {
                symbol,
                description: description[i].clone(),
                sector: sector[i].clone(),
                industry: industry[i].clone(),
                exchange: exchange[i].clone(),
                close: close[i],
                volume: volume[i],
                market_cap: market_cap[i],
                fcf_margin: fcf_margin[i],
                asset_turnover: asset_turnover[i],
                net_income: net_income[i],
                operating_margin: operating_margin[i],
                gross_margin: gross_margin[i],
                return_on_equity: return_on_equity[i],
                return_on_assets: return_on_assets[i],
                revenue_growth: revenue_growth[i],
                net_income_growth: net_income_growth[i],
                fcf_growth: fcf_growth[i],
                debt_to_equity: debt_to_equity[i],
                current_ratio: current_ratio[i],
                quick_ratio: quick_ratio[i],
                price_earnings: price_earnings[i],
                price_book: price_book[i],
                price_sales: price_sales[i],
                peg: peg[i],
                ratings: TechnicalRatings {
                    all: all[i],
                    all_weekly: all_weekly[i],
                    moving_averages: ma[i],
                    moving_averages_weekly: ma_weekly[i],
                    oscillators: other[i],
                    oscillators_weekly: other_weekly[i],
                },
            });
        }

        Ok(records)
    }
}

/// Read a column as optional floats, casting integer columns. NaN reads as absent.
///
/// Returns `Ok(None)` when the column does not exist.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(Some(values))
}

/// Read a column as optional strings.
///
/// Returns `Ok(None)` when the column does not exist.
pub fn str_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(Some(values))
}
