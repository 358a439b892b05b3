//! Rationale Tagger
//!
//! Explains why a record was shortlisted. Checks run in a fixed order and,
//! within one metric, the higher threshold preempts the lower one.

use derive_more::Display;
use kestrel_factors::{Metric, ScoredRecord};
use serde::{Deserialize, Serialize};

/// Label used when no tag applies.
pub const BASELINE_LABEL: &str = "符合基础标准";

/// Separator between tags in a rationale label.
pub const SEPARATOR: &str = " | ";

/// Raw PEG assumed when absent; never attractive.
const MISSING_PEG: f64 = 999.0;

/// A reason a record was shortlisted.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RationaleTag {
    /// Cash-margin rank of at least 80
    #[display("利润率领先")]
    MarginLeader,
    /// Cash-margin rank of at least 60
    #[display("利润率优秀")]
    MarginStrong,
    /// Turnover rank of at least 80
    #[display("资产周转领先")]
    TurnoverLeader,
    /// Turnover rank of at least 60
    #[display("资产周转优秀")]
    TurnoverStrong,
    /// Composite of at least 80
    #[display("现金流回报领先")]
    CashReturnLeader,
    /// Composite of at least 60
    #[display("现金流回报优秀")]
    CashReturnStrong,
    /// PEG below 1
    #[display("市盈增长率极具吸引力")]
    PegAttractive,
    /// PEG below 1.5
    #[display("市盈增长率合理")]
    PegReasonable,
    /// Net income growth above 20%
    #[display("高盈利增长")]
    HighEarningsGrowth,
    /// Net income growth above 10%
    #[display("稳健盈利增长")]
    SteadyEarningsGrowth,
}

/// Tags that apply to a record, in check order.
///
/// Missing ranks and composite read as 0, missing net income growth as 0, and
/// a missing PEG as 999.
pub fn rationale_tags(record: &ScoredRecord) -> Vec<RationaleTag> {
    let fcf_rank = record.rank(Metric::FcfMargin).unwrap_or(0.0);
    let turnover_rank = record.rank(Metric::AssetTurnover).unwrap_or(0.0);
    let composite = record.composite.unwrap_or(0.0);
    let peg = record.value(Metric::Peg).unwrap_or(MISSING_PEG);
    let ni_growth = record.value(Metric::NetIncomeGrowth).unwrap_or(0.0);

    let checks = [
        tier(fcf_rank >= 80.0, fcf_rank >= 60.0, RationaleTag::MarginLeader, RationaleTag::MarginStrong),
        tier(
            turnover_rank >= 80.0,
            turnover_rank >= 60.0,
            RationaleTag::TurnoverLeader,
            RationaleTag::TurnoverStrong,
        ),
        tier(
            composite >= 80.0,
            composite >= 60.0,
            RationaleTag::CashReturnLeader,
            RationaleTag::CashReturnStrong,
        ),
        tier(peg < 1.0, peg < 1.5, RationaleTag::PegAttractive, RationaleTag::PegReasonable),
        tier(
            ni_growth > 0.2,
            ni_growth > 0.1,
            RationaleTag::HighEarningsGrowth,
            RationaleTag::SteadyEarningsGrowth,
        ),
    ];
    checks.into_iter().flatten().collect()
}

/// Rationale label: tags joined by `" | "`, or [`BASELINE_LABEL`].
pub fn rationale(record: &ScoredRecord) -> String {
    let tags = rationale_tags(record);
    if tags.is_empty() {
        return BASELINE_LABEL.to_string();
    }
    tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(SEPARATOR)
}

const fn tier(
    high: bool,
    low: bool,
    high_tag: RationaleTag,
    low_tag: RationaleTag,
) -> Option<RationaleTag> {
    if high {
        Some(high_tag)
    } else if low {
        Some(low_tag)
    } else {
        None
    }
}
