//! sealdrop-crypto: hybrid envelope encryption for user-to-user file transfer
//!
//! Pipeline (upload): plaintext → marker-prefixed envelope → XChaCha20-Poly1305
//! → opaque ciphertext string; content key → RSA split-key or ECIES wrap →
//! recipient-held half + metadata-stored half.
//!
//! Envelope format:
//! ```text
//! "v1:" || base64( [24-byte nonce][ciphertext of MAGICSTRING || payload][16-byte tag] )
//! ```
//!
//! Wrapped-key formats:
//! ```text
//! RSA:   base64(RSA-OAEP-SHA256(key_hex)) split at char 16
//!          → fragment_a (recipient) + symmetric-sealed tail (metadata)
//! ECIES: base64(nonce || AEAD(key_hex || hmac_hex)) under SHA-256(ECDH secret)
//!          → wrapped_key (recipient) + ephemeral public point (metadata)
//! ```

pub mod ecies;
pub mod envelope;
pub mod key;
pub mod rsa_wrap;
pub mod wrap;

pub use ecies::EciesKeyWrap;
pub use envelope::{decrypt_content, encrypt_content, MARKER};
pub use key::{ContentKey, KEY_SIZE};
pub use rsa_wrap::{RsaKeyWrap, FRAGMENT_A_LEN};
pub use wrap::{KeyWrapper, WrapScheme, WrappedKey};

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
