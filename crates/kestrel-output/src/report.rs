//! Console report for the final list.

use crate::row::ScreeningRow;
use std::fmt;

/// Aggregate view of the final list.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySummary {
    /// Number of positions
    pub count: usize,
    /// Mean focus score
    pub mean_focus_score: f64,
    /// Mean market cap in 亿
    pub mean_market_cap_yi: f64,
    /// Distinct sector labels, in first-seen order
    pub sectors: Vec<String>,
}

impl StrategySummary {
    /// Summarize `rows`. `None` when there are no rows.
    pub fn from_rows(rows: &[ScreeningRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let n = rows.len() as f64;
        let mut sectors: Vec<String> = Vec::new();
        for sector in rows.iter().filter_map(|r| r.sector.as_ref()) {
            if !sectors.contains(sector) {
                sectors.push(sector.clone());
            }
        }

        Some(Self {
            count: rows.len(),
            mean_focus_score: rows.iter().map(|r| r.focus_score).sum::<f64>() / n,
            mean_market_cap_yi: rows.iter().map(|r| r.market_cap_yi).sum::<f64>() / n,
            sectors,
        })
    }
}

impl fmt::Display for StrategySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy summary:")?;
        writeln!(f, "- Candidates:         {}", self.count)?;
        writeln!(f, "- Mean focus score:   {:.1}", self.mean_focus_score)?;
        writeln!(f, "- Mean market cap:    {:.1} 亿", self.mean_market_cap_yi)?;
        write!(f, "- Sectors:            {}", self.sectors.join(", "))
    }
}

/// Top-N table of the final list plus its summary.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningReport<'a> {
    rows: &'a [ScreeningRow],
    head: usize,
}

impl<'a> ScreeningReport<'a> {
    /// Report over `rows`, showing at most `head` of them in the table.
    pub const fn new(rows: &'a [ScreeningRow], head: usize) -> Self {
        Self { rows, head }
    }

    /// Summary of all rows, not just the head.
    pub fn summary(&self) -> Option<StrategySummary> {
        StrategySummary::from_rows(self.rows)
    }

    /// Format the head of the list as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&"=".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "FCF / turnover strategy: top {} of {}\n",
            self.head.min(self.rows.len()),
            self.rows.len()
        ));
        output.push_str(&"=".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:<10} {:<16} {:>7} {:>10} {:>9} {:>7} {:>8} {:>8}  {}\n",
            "Code", "Name", "Sector", "Focus", "Cap(亿)", "Price", "Rank", "Attn", "Weight", "Rationale"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        let opt = |v: Option<f64>, precision: usize| {
            v.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
        };
        for row in self.rows.iter().take(self.head) {
            output.push_str(&format!(
                "{:<8} {:<10} {:<16} {:>7.2} {:>10.1} {:>9} {:>7} {:>8} {:>7.2}%  {}\n",
                row.code,
                row.name.as_deref().unwrap_or("-"),
                row.sector.as_deref().unwrap_or("-"),
                row.focus_score,
                row.market_cap_yi,
                opt(row.latest_price.or(row.close), 2),
                opt(row.current_rank, 0),
                opt(row.attention_index, 1),
                row.weight * 100.0,
                row.rationale,
            ));
        }

        output.push_str(&"=".repeat(100));
        output.push('\n');
        output
    }

    /// Format the head of the list as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("| Code | Name | Sector | Focus | Cap (亿) | Weight | Rationale |\n");
        output.push_str("|------|------|--------|-------|----------|--------|-----------|\n");
        for row in self.rows.iter().take(self.head) {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} | {:.1} | {:.2}% | {} |\n",
                row.code,
                row.name.as_deref().unwrap_or(""),
                row.sector.as_deref().unwrap_or(""),
                row.focus_score,
                row.market_cap_yi,
                row.weight * 100.0,
                row.rationale,
            ));
        }
        output
    }
}

impl fmt::Display for ScreeningReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())?;
        if let Some(summary) = self.summary() {
            writeln!(f)?;
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}
