//! Per-file content keys: generated fresh per upload, never persisted in
//! plaintext, hex-encoded wherever the wrap wire formats need text.

use rand::RngCore;
use sealdrop_core::{SealdropError, SealdropResult};
use zeroize::Zeroize;

/// Size of a content key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// A per-file 256-bit symmetric key. Zeroized on drop.
#[derive(Clone)]
pub struct ContentKey {
    bytes: [u8; KEY_SIZE],
}

impl ContentKey {
    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Lowercase hex form (64 chars), the text representation the wrap
    /// protocols carry.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse the 64-char hex form back into a key.
    pub fn from_hex(s: &str) -> SealdropResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| SealdropError::KeyWrap("malformed key material".into()))?;
        Ok(Self { bytes })
    }
}

impl Drop for ContentKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for ContentKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ContentKey {}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
