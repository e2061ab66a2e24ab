use chrono::{NaiveDate, Utc};

use crate::errors::CoreError;

use super::transaction::{NewTransaction, TransactionType};

/// Raw state of the "add transaction" form, as typed by the user.
///
/// Only checks that the required fields are present and the amount is a
/// number. Zero and negative amounts pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub kind: TransactionType,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionForm {
    /// Empty expense form dated `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            kind: TransactionType::Expense,
            amount: String::new(),
            category: String::new(),
            description: String::new(),
            date,
        }
    }

    /// Switch income/expense. Clears the category since the suggestion
    /// list differs per type.
    pub fn set_kind(&mut self, kind: TransactionType) {
        if self.kind != kind {
            self.kind = kind;
            self.category.clear();
        }
    }

    /// Validate and turn the form into ledger input recorded in `currency`.
    pub fn submit(&self, currency: &str) -> Result<NewTransaction, CoreError> {
        let amount_text = self.amount.trim();
        if amount_text.is_empty() {
            return Err(CoreError::ValidationError("amount is required".into()));
        }
        let amount: f64 = amount_text.parse().map_err(|_| {
            CoreError::ValidationError(format!("amount '{amount_text}' is not a number"))
        })?;
        if !amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "amount '{amount_text}' is not a finite number"
            )));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(CoreError::ValidationError("category is required".into()));
        }

        let description = self.description.trim();
        Ok(NewTransaction {
            kind: self.kind,
            amount,
            category: category.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            date: self.date,
            currency: currency.to_string(),
        })
    }

    /// Back to a blank expense form, keeping the date.
    pub fn reset(&mut self) {
        *self = Self::new(self.date);
    }
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}
