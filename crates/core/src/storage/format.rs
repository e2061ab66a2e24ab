use crate::errors::CoreError;

use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};

/// Magic bytes at the start of every backup.
pub const MAGIC: &[u8; 4] = b"FTBK";

pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN;

/// Plaintext header of an encrypted backup.
///
/// ```text
/// [FTBK: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext + tag ...]
/// ```
///
/// The ciphertext runs to the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
}

impl BackupHeader {
    /// Header followed by `ciphertext`.
    pub fn encode(&self, ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.memory_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.time_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.parallelism.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(ciphertext);
        buf
    }

    /// Split `data` into a validated header and the ciphertext.
    pub fn decode(data: &[u8]) -> Result<(Self, &[u8]), CoreError> {
        if data.len() < HEADER_LEN {
            return Err(CoreError::InvalidFileFormat(format!(
                "Backup too short: {} bytes, header alone is {HEADER_LEN}",
                data.len()
            )));
        }

        let mut reader = Reader { data, pos: 0 };

        if reader.take::<4>() != *MAGIC {
            return Err(CoreError::InvalidFileFormat(
                "Missing FTBK magic bytes, not a finance tracker backup".into(),
            ));
        }

        let version = u16::from_le_bytes(reader.take());
        if version == 0 || version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }

        let kdf_params = KdfParams {
            memory_cost: u32::from_le_bytes(reader.take()),
            time_cost: u32::from_le_bytes(reader.take()),
            parallelism: u32::from_le_bytes(reader.take()),
        };
        kdf_params.validate()?;

        let salt = reader.take();
        let nonce = reader.take();

        let header = Self {
            version,
            kdf_params,
            salt,
            nonce,
        };
        Ok((header, &data[reader.pos..]))
    }
}

/// Fixed-size cursor; callers check the total length up front.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}
