use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::transaction::Transaction;

use super::encryption::{random_bytes, KdfParams, SealingKey};
use super::format::{BackupHeader, CURRENT_VERSION};

/// Everything a session needs to be restored elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub created_at: DateTime<Utc>,
    pub selected_currency: String,
    pub transactions: Vec<Transaction>,
}

impl Backup {
    pub fn new(transactions: Vec<Transaction>, selected_currency: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            selected_currency: selected_currency.into(),
            transactions,
        }
    }
}

/// Password-protected, portable backup files.
///
/// Backup → bincode → AES-256-GCM(Argon2id(password)) → FTBK bytes.
#[derive(Debug, Clone, Default)]
pub struct BackupManager {
    kdf_params: KdfParams,
}

impl BackupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use non-default Argon2id costs for new backups. Reading always uses
    /// the costs stored in the backup header.
    pub fn with_kdf_params(kdf_params: KdfParams) -> Self {
        Self { kdf_params }
    }

    pub fn seal(&self, backup: &Backup, password: &str) -> Result<Vec<u8>, CoreError> {
        self.kdf_params.validate()?;

        let plaintext = bincode::serialize(backup)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize backup: {e}")))?;

        let header = BackupHeader {
            version: CURRENT_VERSION,
            kdf_params: self.kdf_params,
            salt: random_bytes()?,
            nonce: random_bytes()?,
        };
        let key = SealingKey::derive(password, &header.salt, &header.kdf_params)?;
        let ciphertext = key.seal(&header.nonce, &plaintext)?;

        debug!(transactions = backup.transactions.len(), bytes = ciphertext.len(), "backup sealed");
        Ok(header.encode(&ciphertext))
    }

    pub fn open(&self, data: &[u8], password: &str) -> Result<Backup, CoreError> {
        let (header, ciphertext) = BackupHeader::decode(data)?;
        let key = SealingKey::derive(password, &header.salt, &header.kdf_params)?;
        let plaintext = key.open(&header.nonce, ciphertext)?;

        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize backup: {e}")))
    }
}
