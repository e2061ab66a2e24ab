use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, gifts, ...)
    Income,
    /// Money going out (food, rent, ...)
    Expense,
}

impl TransactionType {
    /// Categories offered by the entry form for this type.
    ///
    /// Advisory only: a transaction may carry any category string.
    #[must_use]
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => &["Salary", "Freelance", "Scholarship", "Gift", "Other Income"],
            TransactionType::Expense => &[
                "Food",
                "Transportation",
                "Books",
                "Entertainment",
                "Housing",
                "Utilities",
                "Healthcare",
                "Other",
            ],
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// Opaque transaction identifier.
///
/// Stored as a plain string so ledgers written by older front-ends
/// (timestamp ids) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Fresh random (v4 UUID) id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to record a transaction, minus the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub currency: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionType,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: None,
            date,
            currency: currency.into(),
        }
    }

    pub fn income(amount: f64, category: impl Into<String>, date: NaiveDate, currency: impl Into<String>) -> Self {
        Self::new(TransactionType::Income, amount, category, date, currency)
    }

    pub fn expense(amount: f64, category: impl Into<String>, date: NaiveDate, currency: impl Into<String>) -> Self {
        Self::new(TransactionType::Expense, amount, category, date, currency)
    }

    /// Attach a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A recorded transaction. Never modified once it is in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within the ledger, never reused
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Amount in units of `currency`. Not checked for sign.
    pub amount: f64,

    /// Free-form label; see [`TransactionType::suggested_categories`]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Calendar date, no time-of-day
    pub date: NaiveDate,

    /// Currency code the amount was recorded in
    pub currency: String,
}

impl Transaction {
    /// Stamp a fresh id onto the given data.
    pub fn from_new(data: NewTransaction) -> Self {
        Self {
            id: TransactionId::generate(),
            kind: data.kind,
            amount: data.amount,
            category: data.category,
            description: data.description,
            date: data.date,
            currency: data.currency,
        }
    }

    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}
