use thiserror::Error;

pub type SealdropResult<T> = Result<T, SealdropError>;

/// Failure taxonomy for the envelope/wrap pipeline.
///
/// `Integrity` and `KeyWrap` deliberately carry no byte-level detail: the
/// caller learns that a key was wrong or data was tampered with, never which
/// comparison failed.
#[derive(Debug, Error)]
pub enum SealdropError {
    /// Content decryption failed: wrong content key or corrupted ciphertext.
    #[error("integrity check failed: wrong key or corrupted ciphertext")]
    Integrity,

    /// Key wrap/unwrap failed: wrong fragment, tampered wrapped-key material,
    /// or a key-store rejection.
    #[error("key wrap failure: {0}")]
    KeyWrap(String),

    /// KeyMaterialStore or BlobStore unreachable, denied, or misbehaving.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Referenced object absent in the blob store.
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
