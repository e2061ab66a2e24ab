use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters, recorded in every backup header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    /// Lanes
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19_456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Reject parameters read from an untrusted header that would make
    /// key derivation absurdly expensive.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(8..=1_048_576).contains(&self.memory_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF memory_cost out of range: {} KiB (expected 8..=1048576)",
                self.memory_cost
            )));
        }
        if !(1..=20).contains(&self.time_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF time_cost out of range: {} (expected 1..=20)",
                self.time_cost
            )));
        }
        if !(1..=16).contains(&self.parallelism) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF parallelism out of range: {} (expected 1..=16)",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// AES-256-GCM key derived from a password.
pub struct SealingKey([u8; KEY_LEN]);

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SealingKey(..)")
    }
}

impl SealingKey {
    /// Argon2id(password, salt) with the given costs.
    pub fn derive(password: &str, salt: &[u8; SALT_LEN], params: &KdfParams) -> Result<Self, CoreError> {
        let argon2_params = Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

        let mut key = [0u8; KEY_LEN];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|e| CoreError::Encryption(format!("Key derivation failed: {e}")))?;

        Ok(Self(key))
    }

    /// Encrypt; the 16-byte GCM tag is appended to the output.
    pub fn seal(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CoreError> {
        self.cipher()?
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| CoreError::Encryption(format!("AES-256-GCM seal: {e}")))
    }

    /// Decrypt and verify. Wrong key or tampered input is `Decryption`.
    pub fn open(&self, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CoreError> {
        Ok(self.cipher()?.decrypt(Nonce::from_slice(nonce), ciphertext)?)
    }

    fn cipher(&self) -> Result<Aes256Gcm, CoreError> {
        Aes256Gcm::new_from_slice(&self.0)
            .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))
    }
}

/// `N` bytes from the OS CSPRNG (salts and nonces).
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to gather randomness: {e}")))?;
    Ok(buf)
}
