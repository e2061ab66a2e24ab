use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Display currency the figures are labelled with (no conversion applied)
    pub currency: String,

    /// Number of transactions in the ledger
    pub transaction_count: usize,

    /// Sum of income amounts
    pub total_income: f64,

    /// Sum of expense amounts
    pub total_expenses: f64,

    /// total_income - total_expenses, may be negative
    pub net_savings: f64,

    /// net_savings / total_income * 100, or 0 without income
    pub savings_rate: f64,
}

impl DashboardSummary {
    /// True when expenses exceed income.
    #[must_use]
    pub fn is_deficit(&self) -> bool {
        self.net_savings < 0.0
    }

    /// Savings rate with one decimal digit, e.g. "75.0%".
    #[must_use]
    pub fn format_savings_rate(&self) -> String {
        format!("{:.1}%", self.savings_rate)
    }
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Share of all expenses, 0..=100 (0 when there are no expenses)
    pub share_pct: f64,
}

/// Income and expense sums for one calendar month.
///
/// Months are bucketed without the year: March 2023 and March 2024 share
/// a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// 1..=12
    pub month: u32,
    /// Short English month name ("Jan", "Feb", ...)
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}
