use serde::{Deserialize, Serialize};

/// Metadata stored alongside an encrypted object.
///
/// Created once at upload and read-only afterwards. Exactly one wrap-scheme
/// field travels with each object, carried by [`WrapField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Name the sender gave the file (before the `.enc` suffix was added).
    pub original_name: String,
    /// Recipient's email; listing filters on this.
    pub owner_email: String,
    pub sender_name: String,
    pub mime_type: String,
    /// Plaintext size in bytes.
    pub size: u64,
    /// Upload time as Unix seconds, decimal string.
    pub upload_timestamp: String,
    /// Scheme-specific wrapped-key material safe to persist.
    #[serde(flatten)]
    pub wrap: WrapField,
}

/// The persisted half of a wrapped content key.
///
/// For RSA this is the sealed tail of the split ciphertext; the recipient
/// holds the 16-char head. For ECIES it is the ephemeral public point; the
/// recipient holds the wrapped key itself. Neither field alone recovers the
/// content key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum WrapField {
    Rsa { sealed_fragment_b: String },
    Ecies { ephemeral_public_key: String },
}
