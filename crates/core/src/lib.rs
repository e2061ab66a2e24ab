pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

use std::collections::HashMap;

use tracing::{info, warn};

use config::TrackerConfig;
use errors::CoreError;
use models::{
    currency::CurrencyRate,
    ledger::Ledger,
    summary::{CategoryTotal, DashboardSummary, MonthlyTotals},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
};
use services::{
    analytics_service::AnalyticsService, currency_service::CurrencyService,
    ledger_service::LedgerService,
};
use storage::{
    backup::{Backup, BackupManager},
    gateway::PersistenceGateway,
    kv::KeyValueStore,
};

/// Main entry point for the finance tracker core library.
///
/// Owns the session state (ledger + selected currency) and the store it is
/// persisted to. Every mutation is written back immediately; reads of
/// derived figures are recomputed from the current ledger on each call.
#[must_use]
pub struct FinanceTracker {
    ledger: Ledger,
    selected_currency: String,
    store: Box<dyn KeyValueStore>,
    gateway: PersistenceGateway,
    ledger_service: LedgerService,
    analytics_service: AnalyticsService,
    currency_service: CurrencyService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("transactions", &self.ledger.len())
            .field("selected_currency", &self.selected_currency)
            .field("config", self.gateway.config())
            .finish()
    }
}

impl FinanceTracker {
    /// Load a session from `store` using the default storage keys.
    ///
    /// Missing or corrupt data yields an empty ledger and USD.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        Self::open_with_config(store, TrackerConfig::default())
    }

    /// Load a session from `store` using the keys and defaults in `config`.
    pub fn open_with_config(store: Box<dyn KeyValueStore>, config: TrackerConfig) -> Self {
        let gateway = PersistenceGateway::new(config);
        let ledger = gateway.load_ledger(store.as_ref());
        let selected_currency = gateway.load_selected_currency(store.as_ref());
        info!(
            transactions = ledger.len(),
            currency = %selected_currency,
            "finance tracker session loaded"
        );

        Self {
            ledger,
            selected_currency,
            store,
            gateway,
            ledger_service: LedgerService::new(),
            analytics_service: AnalyticsService::new(),
            currency_service: CurrencyService::new(),
        }
    }

    /// The backing store, e.g. to inspect what has been persisted.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        self.gateway.config()
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a transaction and persist the ledger. Returns the stored copy.
    pub fn add_transaction(&mut self, data: NewTransaction) -> Transaction {
        let transaction = self.ledger_service.add_transaction(&mut self.ledger, data);
        self.persist_ledger();
        transaction
    }

    /// Delete a transaction by id and persist the ledger.
    /// Unknown ids leave the ledger unchanged; returns whether one was removed.
    pub fn remove_transaction(&mut self, id: &TransactionId) -> bool {
        let removed = self.ledger_service.remove_transaction(&mut self.ledger, id);
        self.persist_ledger();
        removed
    }

    /// All transactions, most recently added first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        self.ledger_service.list(&self.ledger)
    }

    /// All transactions, newest date first.
    #[must_use]
    pub fn transactions_by_date(&self) -> Vec<&Transaction> {
        self.ledger_service.list_by_date(&self.ledger)
    }

    #[must_use]
    pub fn get_transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.ledger_service.get(&self.ledger, id)
    }

    #[must_use]
    pub fn transactions_by_type(&self, kind: TransactionType) -> Vec<&Transaction> {
        self.ledger_service.filter_by_type(&self.ledger, kind)
    }

    /// Case-insensitive search over category and description.
    #[must_use]
    pub fn search_transactions(&self, query: &str) -> Vec<&Transaction> {
        self.ledger_service.search(&self.ledger, query)
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    // ── Currency ────────────────────────────────────────────────────

    #[must_use]
    pub fn selected_currency(&self) -> &str {
        &self.selected_currency
    }

    /// Change the display currency and persist it.
    ///
    /// Any code is accepted; codes outside the table format with `$`.
    /// Recorded transaction amounts are not converted.
    pub fn set_selected_currency(&mut self, code: impl Into<String>) {
        let code: String = code.into();
        self.selected_currency = self.normalize_currency(&code);
        self.persist_currency();
    }

    /// Table entry for the selected currency (falls back to `$` / rate 1).
    pub fn selected_currency_info(&self) -> &'static CurrencyRate {
        self.currency_service.lookup(&self.selected_currency)
    }

    /// Every supported currency, for pickers.
    pub fn available_currencies(&self) -> &'static [CurrencyRate] {
        self.currency_service.all()
    }

    /// Format `amount` with the selected currency's symbol.
    #[must_use]
    pub fn format_amount(&self, amount: f64) -> String {
        self.currency_service.format(amount, &self.selected_currency)
    }

    /// Fixed-rate conversion between two table currencies.
    #[must_use]
    pub fn convert(&self, amount: f64, from_code: &str, to_code: &str) -> f64 {
        self.currency_service.convert(amount, from_code, to_code)
    }

    // ── Aggregates ──────────────────────────────────────────────────

    #[must_use]
    pub fn total_income(&self) -> f64 {
        self.analytics_service.total_income(&self.ledger.transactions)
    }

    #[must_use]
    pub fn total_expenses(&self) -> f64 {
        self.analytics_service.total_expenses(&self.ledger.transactions)
    }

    #[must_use]
    pub fn net_savings(&self) -> f64 {
        self.analytics_service.net_savings(&self.ledger.transactions)
    }

    #[must_use]
    pub fn savings_rate(&self) -> f64 {
        self.analytics_service.savings_rate(&self.ledger.transactions)
    }

    /// Dashboard figures labelled with the selected currency.
    pub fn summary(&self) -> DashboardSummary {
        self.analytics_service
            .summary(&self.ledger.transactions, &self.selected_currency)
    }

    #[must_use]
    pub fn expenses_by_category(&self) -> HashMap<String, f64> {
        self.analytics_service
            .expenses_by_category(&self.ledger.transactions)
    }

    #[must_use]
    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        self.analytics_service
            .category_breakdown(&self.ledger.transactions)
    }

    #[must_use]
    pub fn monthly_totals(&self) -> Vec<MonthlyTotals> {
        self.analytics_service.monthly_totals(&self.ledger.transactions)
    }

    // ── Export / Backup ─────────────────────────────────────────────

    /// The ledger as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger to JSON: {e}")))
    }

    /// The ledger as CSV.
    /// Columns: id, type, amount, category, description, date, currency
    #[must_use]
    pub fn export_csv(&self) -> String {
        let mut csv = String::from("id,type,amount,category,description,date,currency\n");
        for t in &self.ledger.transactions {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_field(t.id.as_str()),
                t.kind,
                t.amount,
                csv_field(&t.category),
                csv_field(t.description.as_deref().unwrap_or("")),
                t.date,
                csv_field(&t.currency),
            ));
        }
        csv
    }

    /// Encrypted snapshot of ledger and selected currency.
    pub fn export_backup(&self, password: &str) -> Result<Vec<u8>, CoreError> {
        self.export_backup_with(&BackupManager::new(), password)
    }

    /// Like [`export_backup`](Self::export_backup) with a caller-chosen manager
    /// (e.g. lighter KDF costs).
    pub fn export_backup_with(&self, manager: &BackupManager, password: &str) -> Result<Vec<u8>, CoreError> {
        let backup = Backup::new(self.ledger.transactions.clone(), self.selected_currency.clone());
        manager.seal(&backup, password)
    }

    /// Replace the session with a backup and persist both keys.
    /// On any error the current session is left untouched.
    /// Returns the number of transactions restored.
    pub fn import_backup(&mut self, data: &[u8], password: &str) -> Result<usize, CoreError> {
        let backup = BackupManager::new().open(data, password)?;

        let mut ledger = Ledger::from_transactions(backup.transactions);
        let dropped = ledger.dedup_ids();
        if dropped > 0 {
            warn!(dropped, "backup had duplicate ids");
        }
        let count = ledger.len();

        self.ledger = ledger;
        self.selected_currency = self.normalize_currency(&backup.selected_currency);
        self.persist_ledger();
        self.persist_currency();

        info!(transactions = count, created_at = %backup.created_at, "backup restored");
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Trimmed code, or the configured default when blank.
    fn normalize_currency(&self, code: &str) -> String {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            self.gateway.config().default_currency.clone()
        } else {
            trimmed.to_string()
        }
    }

    fn persist_ledger(&mut self) {
        if let Err(e) = self.gateway.save_ledger(self.store.as_mut(), &self.ledger) {
            warn!(error = %e, "failed to persist ledger");
        }
    }

    fn persist_currency(&mut self) {
        if let Err(e) = self
            .gateway
            .save_selected_currency(self.store.as_mut(), &self.selected_currency)
        {
            warn!(error = %e, "failed to persist selected currency");
        }
    }
}

/// Quote a CSV field if it contains a delimiter, a quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
