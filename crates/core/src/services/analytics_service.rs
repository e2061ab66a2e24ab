use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

use crate::models::summary::{CategoryTotal, DashboardSummary, MonthlyTotals};
use crate::models::transaction::{Transaction, TransactionType};

/// Derived views over a ledger snapshot: totals, savings rate, category
/// and month breakdowns.
///
/// Stateless. Output depends only on the slice passed in, so the same
/// snapshot always yields the same figures. Amounts are summed as recorded;
/// no currency conversion happens here.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of all income amounts.
    pub fn total_income(&self, transactions: &[Transaction]) -> f64 {
        Self::sum_of(transactions, TransactionType::Income)
    }

    /// Sum of all expense amounts.
    pub fn total_expenses(&self, transactions: &[Transaction]) -> f64 {
        Self::sum_of(transactions, TransactionType::Expense)
    }

    /// Income minus expenses. Negative when in deficit.
    pub fn net_savings(&self, transactions: &[Transaction]) -> f64 {
        self.total_income(transactions) - self.total_expenses(transactions)
    }

    /// Percentage of income kept: `net / income * 100`.
    ///
    /// Defined as 0 when there is no positive income.
    pub fn savings_rate(&self, transactions: &[Transaction]) -> f64 {
        Self::rate_of(self.total_income(transactions), self.total_expenses(transactions))
    }

    /// Expense sums keyed by category, single pass.
    ///
    /// Only categories that appear on at least one expense are present;
    /// income transactions never contribute.
    pub fn expenses_by_category(&self, transactions: &[Transaction]) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for t in transactions.iter().filter(|t| t.is_expense()) {
            *totals.entry(t.category.clone()).or_insert(0.0) += t.amount;
        }
        totals
    }

    /// Category totals with their share of all expenses, largest first.
    /// Ties are ordered by category name.
    pub fn category_breakdown(&self, transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let total_expenses = self.total_expenses(transactions);
        let mut rows: Vec<CategoryTotal> = self
            .expenses_by_category(transactions)
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                share_pct: if total_expenses != 0.0 {
                    total / total_expenses * 100.0
                } else {
                    0.0
                },
                category,
                total,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        rows
    }

    /// Income and expense sums per calendar month, January first.
    ///
    /// The year is ignored, so the same month of different years lands in
    /// one bucket. Months without transactions are absent.
    pub fn monthly_totals(&self, transactions: &[Transaction]) -> Vec<MonthlyTotals> {
        let mut buckets: BTreeMap<u32, MonthlyTotals> = BTreeMap::new();
        for t in transactions {
            let month = t.date.month();
            let bucket = buckets.entry(month).or_insert_with(|| MonthlyTotals {
                month,
                label: t.date.format("%b").to_string(),
                income: 0.0,
                expenses: 0.0,
            });
            match t.kind {
                TransactionType::Income => bucket.income += t.amount,
                TransactionType::Expense => bucket.expenses += t.amount,
            }
        }
        buckets.into_values().collect()
    }

    /// All dashboard figures in one pass over the aggregates.
    pub fn summary(&self, transactions: &[Transaction], currency: &str) -> DashboardSummary {
        let total_income = self.total_income(transactions);
        let total_expenses = self.total_expenses(transactions);

        DashboardSummary {
            currency: currency.to_string(),
            transaction_count: transactions.len(),
            total_income,
            total_expenses,
            net_savings: total_income - total_expenses,
            savings_rate: Self::rate_of(total_income, total_expenses),
        }
    }

    /// `(income - expenses) / income * 100`, or 0 without positive income.
    fn rate_of(income: f64, expenses: f64) -> f64 {
        if income > 0.0 {
            (income - expenses) / income * 100.0
        } else {
            0.0
        }
    }

    fn sum_of(transactions: &[Transaction], kind: TransactionType) -> f64 {
        transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
