use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::transaction::Transaction;

/// The session's transactions, most recently added first.
///
/// Serialized as a bare JSON array so the persisted blob matches what the
/// browser front-end writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Drop entries whose id already appeared earlier in the ledger.
    /// Returns how many were dropped.
    pub fn dedup_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let before = self.transactions.len();
        self.transactions.retain(|t| seen.insert(t.id.clone()));
        before - self.transactions.len()
    }
}
