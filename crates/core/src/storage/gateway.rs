use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::transaction::Transaction;

use super::kv::KeyValueStore;

/// Reads and writes the ledger and the selected currency under the keys
/// named in [`TrackerConfig`].
///
/// Loading fails open: an absent key, unparsable JSON or an empty currency
/// value yields the default (empty ledger / configured currency) and is
/// never reported as an error. First-run sessions rely on this.
///
/// The two keys are written independently; nothing ties the ledger write
/// and the currency write together.
#[derive(Debug, Clone, Default)]
pub struct PersistenceGateway {
    config: TrackerConfig,
}

impl PersistenceGateway {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Overwrite the stored ledger with `ledger` as a JSON array.
    pub fn save_ledger(&self, store: &mut dyn KeyValueStore, ledger: &Ledger) -> Result<(), CoreError> {
        let json = serde_json::to_string(ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;
        store.set(&self.config.ledger_key, &json)?;
        debug!(transactions = ledger.len(), "ledger saved");
        Ok(())
    }

    /// The stored ledger, or an empty one if missing or corrupt.
    ///
    /// Parsing is per entry: a record that does not deserialize (e.g. an
    /// `amount` written as `null` from a non-finite float) is dropped and
    /// the rest still load. Entries repeating an earlier id are dropped so
    /// the loaded ledger keeps unique ids.
    pub fn load_ledger(&self, store: &dyn KeyValueStore) -> Ledger {
        let Some(raw) = store.get(&self.config.ledger_key) else {
            debug!(key = %self.config.ledger_key, "no stored ledger, starting empty");
            return Ledger::new();
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(key = %self.config.ledger_key, error = %e, "stored ledger is corrupt, starting empty");
                return Ledger::new();
            }
        };

        let total = records.len();
        let transactions: Vec<Transaction> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(t) => Some(t),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable ledger entry");
                    None
                }
            })
            .collect();
        let unreadable = total - transactions.len();
        if unreadable > 0 {
            warn!(unreadable, kept = transactions.len(), "stored ledger had unreadable entries");
        }

        let mut ledger = Ledger::from_transactions(transactions);
        let dropped = ledger.dedup_ids();
        if dropped > 0 {
            warn!(dropped, "stored ledger had duplicate ids");
        }

        ledger
    }

    /// Overwrite the stored display currency.
    pub fn save_selected_currency(&self, store: &mut dyn KeyValueStore, code: &str) -> Result<(), CoreError> {
        store.set(&self.config.currency_key, code)?;
        debug!(code, "selected currency saved");
        Ok(())
    }

    /// The stored display currency, or the configured default.
    pub fn load_selected_currency(&self, store: &dyn KeyValueStore) -> String {
        match store.get(&self.config.currency_key) {
            Some(code) if !code.trim().is_empty() => code.trim().to_string(),
            _ => self.config.default_currency.clone(),
        }
    }
}
