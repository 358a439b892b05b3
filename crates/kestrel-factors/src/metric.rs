//! Ranked fundamental metrics and grouping keys.

use derive_more::Display;
use kestrel_data::RawRecord;
use kestrel_data::fundamentals::columns;
use serde::{Deserialize, Serialize};

/// A fundamental metric that receives an industry-relative rank.
///
/// Displays as its scanner column name.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Free cash flow margin (TTM)
    #[display("free_cash_flow_margin_ttm")]
    FcfMargin,
    /// Current asset turnover
    #[display("asset_turnover_current")]
    AssetTurnover,
    /// Operating margin
    #[display("operating_margin")]
    OperatingMargin,
    /// Return on equity
    #[display("return_on_equity")]
    ReturnOnEquity,
    /// Revenue growth year-over-year
    #[display("total_revenue_yoy_growth_ttm")]
    RevenueGrowth,
    /// Net income growth year-over-year
    #[display("net_income_yoy_growth_ttm")]
    NetIncomeGrowth,
    /// Debt to equity
    #[display("debt_to_equity")]
    DebtToEquity,
    /// Price to earnings
    #[display("price_earnings_ttm")]
    PriceEarnings,
    /// Price/earnings to growth
    #[display("price_earnings_growth_ttm")]
    Peg,
}

impl Metric {
    /// All ranked metrics, in scoring order.
    pub const ALL: [Self; 9] = [
        Self::FcfMargin,
        Self::AssetTurnover,
        Self::OperatingMargin,
        Self::ReturnOnEquity,
        Self::RevenueGrowth,
        Self::NetIncomeGrowth,
        Self::DebtToEquity,
        Self::PriceEarnings,
        Self::Peg,
    ];

    /// Scanner column the metric is read from.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::FcfMargin => columns::FCF_MARGIN,
            Self::AssetTurnover => columns::ASSET_TURNOVER,
            Self::OperatingMargin => columns::OPERATING_MARGIN,
            Self::ReturnOnEquity => columns::ROE,
            Self::RevenueGrowth => columns::REVENUE_GROWTH,
            Self::NetIncomeGrowth => columns::NET_INCOME_GROWTH,
            Self::DebtToEquity => columns::DEBT_TO_EQUITY,
            Self::PriceEarnings => columns::PRICE_EARNINGS,
            Self::Peg => columns::PEG,
        }
    }

    /// Name of the derived rank attribute.
    pub fn rank_column(&self) -> String {
        format!("{}_industry_rank", self.column())
    }

    /// Short human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FcfMargin => "FCF margin",
            Self::AssetTurnover => "Asset turnover",
            Self::OperatingMargin => "Operating margin",
            Self::ReturnOnEquity => "ROE",
            Self::RevenueGrowth => "Revenue growth",
            Self::NetIncomeGrowth => "Net income growth",
            Self::DebtToEquity => "Debt/equity",
            Self::PriceEarnings => "P/E",
            Self::Peg => "PEG",
        }
    }

    /// Raw value for a record. NaN reads as absent.
    pub fn value(&self, record: &RawRecord) -> Option<f64> {
        let value = match self {
            Self::FcfMargin => record.fcf_margin,
            Self::AssetTurnover => record.asset_turnover,
            Self::OperatingMargin => record.operating_margin,
            Self::ReturnOnEquity => record.return_on_equity,
            Self::RevenueGrowth => record.revenue_growth,
            Self::NetIncomeGrowth => record.net_income_growth,
            Self::DebtToEquity => record.debt_to_equity,
            Self::PriceEarnings => record.price_earnings,
            Self::Peg => record.peg,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// Categorical column records are bucketed by before ranking.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// Sector classification
    #[default]
    #[display("sector")]
    Sector,
    /// Industry classification
    #[display("industry")]
    Industry,
}

impl GroupKey {
    /// Group label of a record; `None` when the record is unclassified.
    pub fn label<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        match self {
            Self::Sector => record.sector.as_deref(),
            Self::Industry => record.industry.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_column_names() {
        assert_eq!(
            Metric::FcfMargin.rank_column(),
            "free_cash_flow_margin_ttm_industry_rank"
        );
        assert_eq!(Metric::Peg.rank_column(), "price_earnings_growth_ttm_industry_rank");
    }

    #[test]
    fn test_display_matches_column() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string(), metric.column());
        }
    }

    #[test]
    fn test_value_reads_field_and_drops_nan() {
        let record = RawRecord {
            asset_turnover: Some(0.8),
            peg: Some(f64::NAN),
            ..RawRecord::new("600000")
        };
        assert_eq!(Metric::AssetTurnover.value(&record), Some(0.8));
        assert_eq!(Metric::Peg.value(&record), None);
        assert_eq!(Metric::FcfMargin.value(&record), None);
    }

    #[test]
    fn test_group_key_label() {
        let record = RawRecord {
            sector: Some("Finance".to_string()),
            ..RawRecord::new("600036")
        };
        assert_eq!(GroupKey::Sector.label(&record), Some("Finance"));
        assert_eq!(GroupKey::Industry.label(&record), None);
        assert_eq!(GroupKey::default(), GroupKey::Sector);
    }
}
