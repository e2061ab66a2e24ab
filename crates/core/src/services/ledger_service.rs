use tracing::debug;

use crate::models::ledger::Ledger;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId, TransactionType};

/// Create/delete/list over a [`Ledger`].
///
/// Pure business logic, no I/O. There is no update operation; an edit is a
/// remove followed by an add.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Record a transaction. The new entry goes to the front of the ledger.
    ///
    /// No validation happens here; callers that take user input should go
    /// through [`crate::models::form::TransactionForm`] first.
    pub fn add_transaction(&self, ledger: &mut Ledger, data: NewTransaction) -> Transaction {
        let mut transaction = Transaction::from_new(data);
        while ledger.transactions.iter().any(|t| t.id == transaction.id) {
            transaction.id = TransactionId::generate();
        }
        debug!(id = %transaction.id, kind = %transaction.kind, "adding transaction");
        ledger.transactions.insert(0, transaction.clone());
        transaction
    }

    /// Remove the transaction with `id`. Absent ids are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove_transaction(&self, ledger: &mut Ledger, id: &TransactionId) -> bool {
        let before = ledger.transactions.len();
        ledger.transactions.retain(|t| &t.id != id);
        let removed = ledger.transactions.len() != before;
        debug!(%id, removed, "removing transaction");
        removed
    }

    /// The ledger in storage order (most recently added first).
    pub fn list<'a>(&self, ledger: &'a Ledger) -> &'a [Transaction] {
        &ledger.transactions
    }

    /// Newest date first; same-day entries keep ledger order.
    pub fn list_by_date<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Transaction> {
        let mut transactions: Vec<&Transaction> = ledger.transactions.iter().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    pub fn get<'a>(&self, ledger: &'a Ledger, id: &TransactionId) -> Option<&'a Transaction> {
        ledger.transactions.iter().find(|t| &t.id == id)
    }

    pub fn filter_by_type<'a>(&self, ledger: &'a Ledger, kind: TransactionType) -> Vec<&'a Transaction> {
        ledger.transactions.iter().filter(|t| t.kind == kind).collect()
    }

    /// Case-insensitive match against category and description.
    pub fn search<'a>(&self, ledger: &'a Ledger, query: &str) -> Vec<&'a Transaction> {
        let q = query.to_lowercase();
        ledger
            .transactions
            .iter()
            .filter(|t| {
                t.category.to_lowercase().contains(&q)
                    || t.description.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
