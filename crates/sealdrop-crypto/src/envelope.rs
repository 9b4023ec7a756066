//! Content codec: marker-prefixed envelope under XChaCha20-Poly1305.
//!
//! Serialized form:
//! ```text
//! "v1:" || base64( [24-byte random nonce][ciphertext][16-byte Poly1305 tag] )
//! ```
//!
//! The plaintext inside the AEAD is `MAGICSTRING || payload`. The AEAD tag is
//! the integrity guarantee; the 11-byte marker survives as a format sanity
//! check on the decrypted bytes. Envelopes predating the AEAD format (marker
//! check only, no tag) are not accepted — the version prefix gates that.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use sealdrop_core::{SealdropError, SealdropResult};

use crate::key::ContentKey;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Marker prepended to every payload before encryption (11 ASCII bytes).
pub const MARKER: &[u8; 11] = b"MAGICSTRING";

const VERSION_PREFIX: &str = "v1:";

/// Encrypt `plaintext` into an opaque ciphertext string.
///
/// Non-deterministic: a fresh nonce is drawn per call, so encrypting the same
/// payload twice under the same key yields different strings.
pub fn encrypt_content(plaintext: &[u8], key: &ContentKey) -> SealdropResult<String> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let mut envelope = Vec::with_capacity(MARKER.len() + plaintext.len());
    envelope.extend_from_slice(MARKER);
    envelope.extend_from_slice(plaintext);

    let ciphertext = cipher
        .encrypt(nonce, envelope.as_ref())
        .map_err(|e| anyhow::anyhow!("content encryption failed: {e}"))?;

    let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);

    Ok(format!("{VERSION_PREFIX}{}", B64.encode(framed)))
}

/// Decrypt a ciphertext string produced by [`encrypt_content`].
///
/// Returns the payload bytes exactly as given to `encrypt_content` (no
/// padding artifacts, length preserved). Wrong key, corrupted ciphertext,
/// or a marker mismatch all surface as [`SealdropError::Integrity`] with no
/// partial data.
pub fn decrypt_content(ciphertext: &str, key: &ContentKey) -> SealdropResult<Vec<u8>> {
    let encoded = ciphertext
        .strip_prefix(VERSION_PREFIX)
        .ok_or(SealdropError::Integrity)?;

    let framed = B64.decode(encoded).map_err(|_| SealdropError::Integrity)?;
    if framed.len() < NONCE_SIZE + TAG_SIZE + MARKER.len() {
        return Err(SealdropError::Integrity);
    }

    let (nonce_bytes, body) = framed.split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let envelope = cipher
        .decrypt(nonce, body)
        .map_err(|_| SealdropError::Integrity)?;

    if envelope.len() < MARKER.len() || &envelope[..MARKER.len()] != MARKER {
        return Err(SealdropError::Integrity);
    }

    Ok(envelope[MARKER.len()..].to_vec())
}
