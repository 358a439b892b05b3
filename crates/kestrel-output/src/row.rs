//! Flat output row for one weighted position.

use crate::export::ExportError;
use kestrel_data::SectorTranslations;
use kestrel_data::fundamentals::{f64_values, str_values};
use kestrel_factors::Metric;
use kestrel_screen::WeightedRecord;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Output column names.
pub mod columns {
    /// Instrument code
    pub const CODE: &str = "code";
    /// Short name from the sentiment dataset
    pub const NAME: &str = "name";
    /// Company description
    pub const DESCRIPTION: &str = "description";
    /// Localized sector label
    pub const SECTOR: &str = "sector";
    /// Sector label as published by the scanner
    pub const SECTOR_RAW: &str = "sector_raw";
    /// Industry label
    pub const INDUSTRY: &str = "industry";
    /// Listing exchange
    pub const EXCHANGE: &str = "exchange";
    /// Last close
    pub const CLOSE: &str = "close";
    /// Volume
    pub const VOLUME: &str = "volume";
    /// Market cap (CNY)
    pub const MARKET_CAP: &str = "market_cap";
    /// Market cap in 亿
    pub const MARKET_CAP_YI: &str = "market_cap_yi";
    /// Focus score
    pub const FOCUS_SCORE: &str = "focus_score";
    /// Validation score
    pub const VALIDATION_SCORE: &str = "validation_score";
    /// Cash-margin and turnover composite
    pub const COMPOSITE: &str = "fcf_turnover_composite";
    /// Rationale label
    pub const RATIONALE: &str = "rationale";
    /// Free-cash-flow margin
    pub const FCF_MARGIN: &str = "fcf_margin";
    /// Free-cash-flow margin industry rank
    pub const FCF_MARGIN_RANK: &str = "fcf_margin_rank";
    /// Asset turnover
    pub const ASSET_TURNOVER: &str = "asset_turnover";
    /// Asset turnover industry rank
    pub const ASSET_TURNOVER_RANK: &str = "asset_turnover_rank";
    /// Operating margin
    pub const OPERATING_MARGIN: &str = "operating_margin";
    /// Operating margin industry rank
    pub const OPERATING_MARGIN_RANK: &str = "operating_margin_rank";
    /// Return on equity
    pub const RETURN_ON_EQUITY: &str = "return_on_equity";
    /// Return on equity industry rank
    pub const RETURN_ON_EQUITY_RANK: &str = "return_on_equity_rank";
    /// Revenue growth
    pub const REVENUE_GROWTH: &str = "revenue_growth";
    /// Revenue growth industry rank
    pub const REVENUE_GROWTH_RANK: &str = "revenue_growth_rank";
    /// Net income growth
    pub const NET_INCOME_GROWTH: &str = "net_income_growth";
    /// Net income growth industry rank
    pub const NET_INCOME_GROWTH_RANK: &str = "net_income_growth_rank";
    /// Debt to equity
    pub const DEBT_TO_EQUITY: &str = "debt_to_equity";
    /// Debt to equity industry rank
    pub const DEBT_TO_EQUITY_RANK: &str = "debt_to_equity_rank";
    /// Price to earnings
    pub const PRICE_EARNINGS: &str = "price_earnings";
    /// Price to earnings industry rank
    pub const PRICE_EARNINGS_RANK: &str = "price_earnings_rank";
    /// Price/earnings to growth
    pub const PEG: &str = "peg";
    /// Price/earnings to growth industry rank
    pub const PEG_RANK: &str = "peg_rank";
    /// Net income
    pub const NET_INCOME: &str = "net_income";
    /// Gross margin
    pub const GROSS_MARGIN: &str = "gross_margin";
    /// Return on assets
    pub const RETURN_ON_ASSETS: &str = "return_on_assets";
    /// Free-cash-flow growth
    pub const FCF_GROWTH: &str = "fcf_growth";
    /// Current ratio
    pub const CURRENT_RATIO: &str = "current_ratio";
    /// Quick ratio
    pub const QUICK_RATIO: &str = "quick_ratio";
    /// Price to book
    pub const PRICE_BOOK: &str = "price_book";
    /// Price to sales
    pub const PRICE_SALES: &str = "price_sales";
    /// Latest price from the sentiment dataset
    pub const LATEST_PRICE: &str = "latest_price";
    /// Daily change (%)
    pub const CHANGE_PCT: &str = "change_pct";
    /// Turnover rate (%)
    pub const TURNOVER_RATE: &str = "turnover_rate";
    /// Dynamic P/E
    pub const PE_DYNAMIC: &str = "pe_dynamic";
    /// Main-force cost basis
    pub const MAIN_COST: &str = "main_cost";
    /// Institutional participation (%)
    pub const INSTITUTION_PARTICIPATION: &str = "institution_participation";
    /// Sentiment composite score
    pub const SENTIMENT_SCORE: &str = "sentiment_score";
    /// Sentiment rank change
    pub const RANK_CHANGE: &str = "rank_change";
    /// Sentiment current rank
    pub const CURRENT_RANK: &str = "current_rank";
    /// Attention index
    pub const ATTENTION_INDEX: &str = "attention_index";
    /// Sentiment trade date
    pub const TRADE_DATE: &str = "trade_date";
    /// Overall technical rating, daily
    pub const RECOMMEND_ALL: &str = "recommend_all";
    /// Moving-average rating, daily
    pub const RECOMMEND_MA: &str = "recommend_ma";
    /// Oscillator rating, daily
    pub const RECOMMEND_OTHER: &str = "recommend_other";
    /// Overall technical rating, weekly
    pub const RECOMMEND_ALL_WEEKLY: &str = "recommend_all_weekly";
    /// Moving-average rating, weekly
    pub const RECOMMEND_MA_WEEKLY: &str = "recommend_ma_weekly";
    /// Oscillator rating, weekly
    pub const RECOMMEND_OTHER_WEEKLY: &str = "recommend_other_weekly";
    /// Portfolio weight
    pub const WEIGHT: &str = "weight";
}

/// One row of the final list.
///
/// Carries every field of the weighted record it was built from, with the
/// sector label both localized and as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRow {
    /// Instrument code
    pub code: String,
    /// Short name from the sentiment dataset
    pub name: Option<String>,
    /// Company description
    pub description: Option<String>,
    /// Localized sector label
    pub sector: Option<String>,
    /// Sector label as published by the scanner
    pub sector_raw: Option<String>,
    /// Industry label
    pub industry: Option<String>,
    /// Listing exchange
    pub exchange: Option<String>,
    /// Last close
    pub close: Option<f64>,
    /// Volume
    pub volume: Option<f64>,
    /// Market cap (CNY)
    pub market_cap: Option<f64>,
    /// Market cap in 亿
    pub market_cap_yi: f64,
    /// Focus score
    pub focus_score: f64,
    /// Validation score
    pub validation_score: f64,
    /// Cash-margin and turnover composite
    pub fcf_turnover_composite: Option<f64>,
    /// Rationale label
    pub rationale: String,
    /// Free-cash-flow margin
    pub fcf_margin: Option<f64>,
    /// Free-cash-flow margin industry rank
    pub fcf_margin_rank: Option<f64>,
    /// Asset turnover
    pub asset_turnover: Option<f64>,
    /// Asset turnover industry rank
    pub asset_turnover_rank: Option<f64>,
    /// Operating margin
    pub operating_margin: Option<f64>,
    /// Operating margin industry rank
    pub operating_margin_rank: Option<f64>,
    /// Return on equity
    pub return_on_equity: Option<f64>,
    /// Return on equity industry rank
    pub return_on_equity_rank: Option<f64>,
    /// Revenue growth
    pub revenue_growth: Option<f64>,
    /// Revenue growth industry rank
    pub revenue_growth_rank: Option<f64>,
    /// Net income growth
    pub net_income_growth: Option<f64>,
    /// Net income growth industry rank
    pub net_income_growth_rank: Option<f64>,
    /// Debt to equity
    pub debt_to_equity: Option<f64>,
    /// Debt to equity industry rank
    pub debt_to_equity_rank: Option<f64>,
    /// Price to earnings
    pub price_earnings: Option<f64>,
    /// Price to earnings industry rank
    pub price_earnings_rank: Option<f64>,
    /// Price/earnings to growth
    pub peg: Option<f64>,
    /// Price/earnings to growth industry rank
    pub peg_rank: Option<f64>,
    /// Net income
    pub net_income: Option<f64>,
    /// Gross margin
    pub gross_margin: Option<f64>,
    /// Return on assets
    pub return_on_assets: Option<f64>,
    /// Free-cash-flow growth
    pub fcf_growth: Option<f64>,
    /// Current ratio
    pub current_ratio: Option<f64>,
    /// Quick ratio
    pub quick_ratio: Option<f64>,
    /// Price to book
    pub price_book: Option<f64>,
    /// Price to sales
    pub price_sales: Option<f64>,
    /// Latest price from the sentiment dataset
    pub latest_price: Option<f64>,
    /// Daily change (%)
    pub change_pct: Option<f64>,
    /// Turnover rate (%)
    pub turnover_rate: Option<f64>,
    /// Dynamic P/E
    pub pe_dynamic: Option<f64>,
    /// Main-force cost basis
    pub main_cost: Option<f64>,
    /// Institutional participation (%)
    pub institution_participation: Option<f64>,
    /// Sentiment composite score
    pub sentiment_score: Option<f64>,
    /// Sentiment rank change
    pub rank_change: Option<f64>,
    /// Sentiment current rank
    pub current_rank: Option<f64>,
    /// Attention index
    pub attention_index: Option<f64>,
    /// Sentiment trade date
    pub trade_date: Option<String>,
    /// Overall technical rating, daily
    pub recommend_all: Option<f64>,
    /// Moving-average rating, daily
    pub recommend_ma: Option<f64>,
    /// Oscillator rating, daily
    pub recommend_other: Option<f64>,
    /// Overall technical rating, weekly
    pub recommend_all_weekly: Option<f64>,
    /// Moving-average rating, weekly
    pub recommend_ma_weekly: Option<f64>,
    /// Oscillator rating, weekly
    pub recommend_other_weekly: Option<f64>,
    /// Portfolio weight
    pub weight: f64,
}

impl ScreeningRow {
    /// Flatten a weighted record, localizing its sector label.
    pub fn from_weighted(weighted: &WeightedRecord, translations: &SectorTranslations) -> Self {
        let shortlist = &weighted.enriched.shortlist;
        let scored = &shortlist.scored;
        let record = &scored.normalized.record;
        let sentiment = weighted.enriched.sentiment.as_ref();
        let from_sentiment =
            |f: fn(&kestrel_data::SentimentRecord) -> Option<f64>| sentiment.and_then(f);

        Self {
            code: record.symbol.clone(),
            name: sentiment.and_then(|s| s.name.clone()),
            description: record.description.clone(),
            sector: record
                .sector
                .as_deref()
                .map(|s| translations.translate(s).to_string()),
            sector_raw: record.sector.clone(),
            industry: record.industry.clone(),
            exchange: record.exchange.clone(),
            close: record.close,
            volume: record.volume,
            market_cap: record.market_cap,
            market_cap_yi: weighted.size,
            focus_score: scored.focus_score,
            validation_score: scored.validation_score,
            fcf_turnover_composite: scored.composite,
            rationale: shortlist.rationale.clone(),
            fcf_margin: record.fcf_margin,
            fcf_margin_rank: scored.rank(Metric::FcfMargin),
            asset_turnover: record.asset_turnover,
            asset_turnover_rank: scored.rank(Metric::AssetTurnover),
            operating_margin: record.operating_margin,
            operating_margin_rank: scored.rank(Metric::OperatingMargin),
            return_on_equity: record.return_on_equity,
            return_on_equity_rank: scored.rank(Metric::ReturnOnEquity),
            revenue_growth: record.revenue_growth,
            revenue_growth_rank: scored.rank(Metric::RevenueGrowth),
            net_income_growth: record.net_income_growth,
            net_income_growth_rank: scored.rank(Metric::NetIncomeGrowth),
            debt_to_equity: record.debt_to_equity,
            debt_to_equity_rank: scored.rank(Metric::DebtToEquity),
            price_earnings: record.price_earnings,
            price_earnings_rank: scored.rank(Metric::PriceEarnings),
            peg: record.peg,
            peg_rank: scored.rank(Metric::Peg),
            net_income: record.net_income,
            gross_margin: record.gross_margin,
            return_on_assets: record.return_on_assets,
            fcf_growth: record.fcf_growth,
            current_ratio: record.current_ratio,
            quick_ratio: record.quick_ratio,
            price_book: record.price_book,
            price_sales: record.price_sales,
            latest_price: from_sentiment(|s| s.latest_price),
            change_pct: from_sentiment(|s| s.change_pct),
            turnover_rate: from_sentiment(|s| s.turnover_rate),
            pe_dynamic: from_sentiment(|s| s.pe_dynamic),
            main_cost: from_sentiment(|s| s.main_cost),
            institution_participation: from_sentiment(|s| s.institution_participation),
            sentiment_score: from_sentiment(|s| s.composite_score),
            rank_change: from_sentiment(|s| s.rank_change),
            current_rank: from_sentiment(|s| s.current_rank),
            attention_index: from_sentiment(|s| s.attention_index),
            trade_date: sentiment.and_then(|s| s.trade_date.clone()),
            recommend_all: record.ratings.all,
            recommend_ma: record.ratings.moving_averages,
            recommend_other: record.ratings.oscillators,
            recommend_all_weekly: record.ratings.all_weekly,
            recommend_ma_weekly: record.ratings.moving_averages_weekly,
            recommend_other_weekly: record.ratings.oscillators_weekly,
            weight: weighted.weight,
        }
    }

    /// Flatten a weighted list, preserving order.
    pub fn from_weighted_list(
        weighted: &[WeightedRecord],
        translations: &SectorTranslations,
    ) -> Vec<Self> {
        weighted
            .iter()
            .map(|w| Self::from_weighted(w, translations))
            .collect()
    }

    /// Columnar form of `rows`, one column per field.
    pub fn to_dataframe(rows: &[Self]) -> Result<DataFrame, ExportError> {
        let text = |name: &str, f: fn(&Self) -> Option<String>| {
            Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
        };
        let num = |name: &str, f: fn(&Self) -> Option<f64>| {
            Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
        };
        let req = |name: &str, f: fn(&Self) -> f64| {
            Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
        };

        let df = DataFrame::new(vec![
            Column::new(
                columns::CODE.into(),
                rows.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            ),
            text(columns::NAME, |r| r.name.clone()),
            text(columns::DESCRIPTION, |r| r.description.clone()),
            text(columns::SECTOR, |r| r.sector.clone()),
            text(columns::SECTOR_RAW, |r| r.sector_raw.clone()),
            text(columns::INDUSTRY, |r| r.industry.clone()),
            text(columns::EXCHANGE, |r| r.exchange.clone()),
            num(columns::CLOSE, |r| r.close),
            num(columns::VOLUME, |r| r.volume),
            num(columns::MARKET_CAP, |r| r.market_cap),
            req(columns::MARKET_CAP_YI, |r| r.market_cap_yi),
            req(columns::FOCUS_SCORE, |r| r.focus_score),
            req(columns::VALIDATION_SCORE, |r| r.validation_score),
            num(columns::COMPOSITE, |r| r.fcf_turnover_composite),
            Column::new(
                columns::RATIONALE.into(),
                rows.iter().map(|r| r.rationale.as_str()).collect::<Vec<_>>(),
            ),
            num(columns::FCF_MARGIN, |r| r.fcf_margin),
            num(columns::FCF_MARGIN_RANK, |r| r.fcf_margin_rank),
            num(columns::ASSET_TURNOVER, |r| r.asset_turnover),
            num(columns::ASSET_TURNOVER_RANK, |r| r.asset_turnover_rank),
            num(columns::OPERATING_MARGIN, |r| r.operating_margin),
            num(columns::OPERATING_MARGIN_RANK, |r| r.operating_margin_rank),
            num(columns::RETURN_ON_EQUITY, |r| r.return_on_equity),
            num(columns::RETURN_ON_EQUITY_RANK, |r| r.return_on_equity_rank),
            num(columns::REVENUE_GROWTH, |r| r.revenue_growth),
            num(columns::REVENUE_GROWTH_RANK, |r| r.revenue_growth_rank),
            num(columns::NET_INCOME_GROWTH, |r| r.net_income_growth),
            num(columns::NET_INCOME_GROWTH_RANK, |r| r.net_income_growth_rank),
            num(columns::DEBT_TO_EQUITY, |r| r.debt_to_equity),
            num(columns::DEBT_TO_EQUITY_RANK, |r| r.debt_to_equity_rank),
            num(columns::PRICE_EARNINGS, |r| r.price_earnings),
            num(columns::PRICE_EARNINGS_RANK, |r| r.price_earnings_rank),
            num(columns::PEG, |r| r.peg),
            num(columns::PEG_RANK, |r| r.peg_rank),
            num(columns::NET_INCOME, |r| r.net_income),
            num(columns::GROSS_MARGIN, |r| r.gross_margin),
            num(columns::RETURN_ON_ASSETS, |r| r.return_on_assets),
            num(columns::FCF_GROWTH, |r| r.fcf_growth),
            num(columns::CURRENT_RATIO, |r| r.current_ratio),
            num(columns::QUICK_RATIO, |r| r.quick_ratio),
            num(columns::PRICE_BOOK, |r| r.price_book),
            num(columns::PRICE_SALES, |r| r.price_sales),
            num(columns::LATEST_PRICE, |r| r.latest_price),
            num(columns::CHANGE_PCT, |r| r.change_pct),
            num(columns::TURNOVER_RATE, |r| r.turnover_rate),
            num(columns::PE_DYNAMIC, |r| r.pe_dynamic),
            num(columns::MAIN_COST, |r| r.main_cost),
            num(columns::INSTITUTION_PARTICIPATION, |r| r.institution_participation),
            num(columns::SENTIMENT_SCORE, |r| r.sentiment_score),
            num(columns::RANK_CHANGE, |r| r.rank_change),
            num(columns::CURRENT_RANK, |r| r.current_rank),
            num(columns::ATTENTION_INDEX, |r| r.attention_index),
            text(columns::TRADE_DATE, |r| r.trade_date.clone()),
            num(columns::RECOMMEND_ALL, |r| r.recommend_all),
            num(columns::RECOMMEND_MA, |r| r.recommend_ma),
            num(columns::RECOMMEND_OTHER, |r| r.recommend_other),
            num(columns::RECOMMEND_ALL_WEEKLY, |r| r.recommend_all_weekly),
            num(columns::RECOMMEND_MA_WEEKLY, |r| r.recommend_ma_weekly),
            num(columns::RECOMMEND_OTHER_WEEKLY, |r| r.recommend_other_weekly),
            req(columns::WEIGHT, |r| r.weight),
        ])?;


        Ok(df)
    }

    /// Decode rows written by [`to_dataframe`](Self::to_dataframe).
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>, ExportError> {
        let height = df.height();
        let missing = |name: &str| ExportError::InvalidFormat(format!("missing column {name}"));
        let text = |name: &str| -> Result<Vec<Option<String>>, ExportError> {
            Ok(str_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };
        let num = |name: &str| -> Result<Vec<Option<f64>>, ExportError> {
            Ok(f64_values(df, name)?.unwrap_or_else(|| vec![None; height]))
        };
        let required_num = |name: &str| -> Result<Vec<Option<f64>>, ExportError> {
            f64_values(df, name)?.ok_or_else(|| missing(name))
        };

        let code = str_values(df, columns::CODE)?.ok_or_else(|| missing(columns::CODE))?;
        let name = text(columns::NAME)?;
        let description = text(columns::DESCRIPTION)?;
        let sector = text(columns::SECTOR)?;
        let sector_raw = text(columns::SECTOR_RAW)?;
        let industry = text(columns::INDUSTRY)?;
        let exchange = text(columns::EXCHANGE)?;
        let close = num(columns::CLOSE)?;
        let volume = num(columns::VOLUME)?;
        let market_cap = num(columns::MARKET_CAP)?;
        let market_cap_yi = required_num(columns::MARKET_CAP_YI)?;
        let focus_score = required_num(columns::FOCUS_SCORE)?;
        let validation_score = required_num(columns::VALIDATION_SCORE)?;
        let composite = num(columns::COMPOSITE)?;
        let rationale =
            str_values(df, columns::RATIONALE)?.ok_or_else(|| missing(columns::RATIONALE))?;
        let fcf_margin = num(columns::FCF_MARGIN)?;
        let fcf_margin_rank = num(columns::FCF_MARGIN_RANK)?;
        let asset_turnover = num(columns::ASSET_TURNOVER)?;
        let asset_turnover_rank = num(columns::ASSET_TURNOVER_RANK)?;
        let operating_margin = num(columns::OPERATING_MARGIN)?;
        let operating_margin_rank = num(columns::OPERATING_MARGIN_RANK)?;
        let return_on_equity = num(columns::RETURN_ON_EQUITY)?;
        let return_on_equity_rank = num(columns::RETURN_ON_EQUITY_RANK)?;
        let revenue_growth = num(columns::REVENUE_GROWTH)?;
        let revenue_growth_rank = num(columns::REVENUE_GROWTH_RANK)?;
        let net_income_growth = num(columns::NET_INCOME_GROWTH)?;
        let net_income_growth_rank = num(columns::NET_INCOME_GROWTH_RANK)?;
        let debt_to_equity = num(columns::DEBT_TO_EQUITY)?;
        let debt_to_equity_rank = num(columns::DEBT_TO_EQUITY_RANK)?;
        let price_earnings = num(columns::PRICE_EARNINGS)?;
        let price_earnings_rank = num(columns::PRICE_EARNINGS_RANK)?;
        let peg = num(columns::PEG)?;
        let peg_rank = num(columns::PEG_RANK)?;
        let net_income = num(columns::NET_INCOME)?;
        let gross_margin = num(columns::GROSS_MARGIN)?;
        let return_on_assets = num(columns::RETURN_ON_ASSETS)?;
        let fcf_growth = num(columns::FCF_GROWTH)?;
        let current_ratio = num(columns::CURRENT_RATIO)?;
        let quick_ratio = num(columns::QUICK_RATIO)?;
        let price_book = num(columns::PRICE_BOOK)?;
        let price_sales = num(columns::PRICE_SALES)?;
        let latest_price = num(columns::LATEST_PRICE)?;
        let change_pct = num(columns::CHANGE_PCT)?;
        let turnover_rate = num(columns::TURNOVER_RATE)?;
        let pe_dynamic = num(columns::PE_DYNAMIC)?;
        let main_cost = num(columns::MAIN_COST)?;
        let institution_participation = num(columns::INSTITUTION_PARTICIPATION)?;
        let sentiment_score = num(columns::SENTIMENT_SCORE)?;
        let rank_change = num(columns::RANK_CHANGE)?;
        let current_rank = num(columns::CURRENT_RANK)?;
        let attention_index = num(columns::ATTENTION_INDEX)?;
        let trade_date = text(columns::TRADE_DATE)?;
        let recommend_all = num(columns::RECOMMEND_ALL)?;
        let recommend_ma = num(columns::RECOMMEND_MA)?;
        let recommend_other = num(columns::RECOMMEND_OTHER)?;
        let recommend_all_weekly = num(columns::RECOMMEND_ALL_WEEKLY)?;
        let recommend_ma_weekly = num(columns::RECOMMEND_MA_WEEKLY)?;
        let recommend_other_weekly = num(columns::RECOMMEND_OTHER_WEEKLY)?;
        let weight = required_num(columns::WEIGHT)?;

        let null = |column: &str, i: usize| {
            ExportError::InvalidFormat(format!("row {i} has no {column}"))
        };

        (0..height)
            .map(|i| {
                Ok(Self {
                    code: code[i].clone().ok_or_else(|| null(columns::CODE, i))?,
                    name: name[i].clone(),
                    description: description[i].clone(),
                    sector: sector[i].clone(),
                    sector_raw: sector_raw[i].clone(),
                    industry: industry[i].clone(),
                    exchange: exchange[i].clone(),
                    close: close[i],
                    volume: volume[i],
                    market_cap: market_cap[i],
                    market_cap_yi: market_cap_yi[i]
                        .ok_or_else(|| null(columns::MARKET_CAP_YI, i))?,
                    focus_score: focus_score[i].ok_or_else(|| null(columns::FOCUS_SCORE, i))?,
                    validation_score: validation_score[i]
                        .ok_or_else(|| null(columns::VALIDATION_SCORE, i))?,
                    fcf_turnover_composite: composite[i],
                    rationale: rationale[i]
                        .clone()
                        .ok_or_else(|| null(columns::RATIONALE, i))?,
                    fcf_margin: fcf_margin[i],
                    fcf_margin_rank: fcf_margin_rank[i],
                    asset_turnover: asset_turnover[i],
                    asset_turnover_rank: asset_turnover_rank[i],
                    operating_margin: operating_margin[i],
                    operating_margin_rank: operating_margin_rank[i],
                    return_on_equity: return_on_equity[i],
                    return_on_equity_rank: return_on_equity_rank[i],
                    revenue_growth: revenue_growth[i],
                    revenue_growth_rank: revenue_growth_rank[i],
                    net_income_growth: net_income_growth[i],
                    net_income_growth_rank: net_income_growth_rank[i],
                    debt_to_equity: debt_to_equity[i],
                    debt_to_equity_rank: debt_to_equity_rank[i],
                    price_earnings: price_earnings[i],
                    price_earnings_rank: price_earnings_rank[i],
                    peg: peg[i],
                    peg_rank: peg_rank[i],
                    net_income: net_income[i],
                    gross_margin: gross_margin[i],
                    return_on_assets: return_on_assets[i],
                    fcf_growth: fcf_growth[i],
                    current_ratio: current_ratio[i],
                    quick_ratio: quick_ratio[i],
                    price_book: price_book[i],
                    price_sales: price_sales[i],
                    latest_price: latest_price[i],
                    change_pct: change_pct[i],
                    turnover_rate: turnover_rate[i],
                    pe_dynamic: pe_dynamic[i],
                    main_cost: main_cost[i],
                    institution_participation: institution_participation[i],
                    sentiment_score: sentiment_score[i],
                    rank_change: rank_change[i],
                    current_rank: current_rank[i],
                    attention_index: attention_index[i],
                    trade_date: trade_date[i].clone(),
                    recommend_all: recommend_all[i],
                    recommend_ma: recommend_ma[i],
                    recommend_other: recommend_other[i],
                    recommend_all_weekly: recommend_all_weekly[i],
                    recommend_ma_weekly: recommend_ma_weekly[i],
                    recommend_other_weekly: recommend_other_weekly[i],
                    weight: weight[i].ok_or_else(|| null(columns::WEIGHT, i))?,
                })
            })
            .collect()
    }
}
