use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_LEDGER_KEY: &str = "finance_tracker_data";
pub const DEFAULT_CURRENCY_KEY: &str = "selected_currency";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Where the tracker keeps its state and what it falls back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Storage key holding the serialized ledger.
    pub ledger_key: String,

    /// Storage key holding the selected display currency.
    pub currency_key: String,

    /// Display currency used on first run or when the stored value is empty.
    pub default_currency: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            currency_key: DEFAULT_CURRENCY_KEY.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
