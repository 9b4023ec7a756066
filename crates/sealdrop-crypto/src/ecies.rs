//! ECIES-style key wrapping: ephemeral secp256k1 ECDH + HMAC authentication.
//!
//! Wrap derives a fresh shared secret against the recipient's long-term
//! public point, hashes it (SHA-256) into a symmetric wrap key, and encrypts
//! `key_hex || hmac_hex` — the content key plus an HMAC-SHA256 over it keyed
//! by the same hash. Unwrap recomputes the HMAC and verifies it in constant
//! time, so a tampered wrapped key or wrong key material fails loudly here
//! instead of surfacing later as a content marker mismatch.
//!
//! The ephemeral public point travels in plaintext metadata; ECDH security
//! does not depend on its secrecy.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use hmac::{Hmac, Mac};
use k256::ecdh::diffie_hellman;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::RngCore;
use sha2::{Digest, Sha256};

use sealdrop_core::{KeyMaterialStore, SealdropError, SealdropResult};

use crate::key::{ContentKey, KEY_SIZE};
use crate::{NONCE_SIZE, TAG_SIZE};

type HmacSha256 = Hmac<Sha256>;

/// Hex length of the content key inside the wrapped plaintext.
const KEY_HEX_LEN: usize = KEY_SIZE * 2;
/// Hex length of the embedded HMAC-SHA256 tag.
const HMAC_HEX_LEN: usize = 64;

/// ECIES key wrap, parameterized by the store-side secret coordinates of the
/// long-term keypair.
#[derive(Debug, Clone)]
pub struct EciesKeyWrap {
    pub ecc_secret_id: String,
    /// Secret version holding the public point (hex SEC1, uncompressed).
    pub public_version: u32,
    /// Secret version holding the private scalar (hex).
    pub private_version: u32,
}

impl EciesKeyWrap {
    pub fn new(ecc_secret_id: impl Into<String>, public_version: u32, private_version: u32) -> Self {
        Self {
            ecc_secret_id: ecc_secret_id.into(),
            public_version,
            private_version,
        }
    }

    /// Wrap a content key: returns `(wrapped_key, ephemeral_public_key)`.
    ///
    /// `wrapped_key` goes to the caller, the hex ephemeral point to object
    /// metadata.
    pub async fn wrap(
        &self,
        kms: &dyn KeyMaterialStore,
        key: &ContentKey,
    ) -> SealdropResult<(String, String)> {
        let recipient = self.fetch_public_key(kms).await?;

        let ephemeral = SecretKey::random(&mut rand::thread_rng());
        let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), recipient.as_affine());
        let wrap_key = derive_wrap_key(shared.raw_secret_bytes());

        let key_hex = key.to_hex();
        let tag_hex = hex::encode(compute_hmac(&wrap_key, &key_hex)?);

        let mut plaintext = String::with_capacity(KEY_HEX_LEN + HMAC_HEX_LEN);
        plaintext.push_str(&key_hex);
        plaintext.push_str(&tag_hex);

        let wrapped_key = seal(&wrap_key, plaintext.as_bytes())?;
        let ephemeral_hex = hex::encode(ephemeral.public_key().to_encoded_point(false).as_bytes());

        tracing::debug!(secret_id = %self.ecc_secret_id, "wrapped content key via ECDH");
        Ok((wrapped_key, ephemeral_hex))
    }

    /// Unwrap a content key from the caller-held `wrapped_key` and the
    /// metadata-stored ephemeral public point.
    ///
    /// Any decode, decrypt, or HMAC failure collapses to the same generic
    /// [`SealdropError::KeyWrap`].
    pub async fn unwrap(
        &self,
        kms: &dyn KeyMaterialStore,
        wrapped_key: &str,
        ephemeral_public_key: &str,
    ) -> SealdropResult<ContentKey> {
        let long_term = self.fetch_private_key(kms).await?;

        let ephemeral_bytes = hex::decode(ephemeral_public_key).map_err(|_| tamper_failure())?;
        let ephemeral = PublicKey::from_sec1_bytes(&ephemeral_bytes).map_err(|_| tamper_failure())?;

        let shared = diffie_hellman(long_term.to_nonzero_scalar(), ephemeral.as_affine());
        let wrap_key = derive_wrap_key(shared.raw_secret_bytes());

        let plaintext = open(&wrap_key, wrapped_key)?;
        let text = std::str::from_utf8(&plaintext).map_err(|_| tamper_failure())?;
        if text.len() != KEY_HEX_LEN + HMAC_HEX_LEN {
            return Err(tamper_failure());
        }

        let (key_hex, tag_hex) = text.split_at(KEY_HEX_LEN);
        let tag = hex::decode(tag_hex).map_err(|_| tamper_failure())?;

        // Constant-time comparison via Mac::verify_slice.
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&wrap_key)
            .map_err(|e| anyhow::anyhow!("HMAC init: {e}"))?;
        mac.update(key_hex.as_bytes());
        mac.verify_slice(&tag).map_err(|_| tamper_failure())?;

        ContentKey::from_hex(key_hex).map_err(|_| tamper_failure())
    }

    async fn fetch_public_key(&self, kms: &dyn KeyMaterialStore) -> SealdropResult<PublicKey> {
        let raw = kms.get_secret(&self.ecc_secret_id, self.public_version).await?;
        let hex_str = String::from_utf8(raw)
            .map_err(|_| SealdropError::Collaborator("EC public key secret is not UTF-8".into()))?;
        let bytes = hex::decode(hex_str.trim())
            .map_err(|_| SealdropError::Collaborator("EC public key secret is not hex".into()))?;
        PublicKey::from_sec1_bytes(&bytes)
            .map_err(|_| SealdropError::Collaborator("EC public key secret is not a curve point".into()))
    }

    async fn fetch_private_key(&self, kms: &dyn KeyMaterialStore) -> SealdropResult<SecretKey> {
        let raw = kms.get_secret(&self.ecc_secret_id, self.private_version).await?;
        let hex_str = String::from_utf8(raw)
            .map_err(|_| SealdropError::Collaborator("EC private key secret is not UTF-8".into()))?;
        let bytes = hex::decode(hex_str.trim())
            .map_err(|_| SealdropError::Collaborator("EC private key secret is not hex".into()))?;
        SecretKey::from_slice(&bytes)
            .map_err(|_| SealdropError::Collaborator("EC private key secret is not a valid scalar".into()))
    }
}

fn tamper_failure() -> SealdropError {
    SealdropError::KeyWrap("tampered or wrong key material".into())
}

/// SHA-256 over the raw ECDH x-coordinate: the symmetric wrap/HMAC key.
fn derive_wrap_key(shared_secret: impl AsRef<[u8]>) -> [u8; KEY_SIZE] {
    Sha256::digest(shared_secret.as_ref()).into()
}

fn compute_hmac(wrap_key: &[u8; KEY_SIZE], key_hex: &str) -> SealdropResult<[u8; 32]> {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(wrap_key).map_err(|e| anyhow::anyhow!("HMAC init: {e}"))?;
    mac.update(key_hex.as_bytes());
    Ok(mac.finalize().into_bytes().into())
}

/// AEAD-seal `plaintext` under the derived wrap key: `base64(nonce || ct)`.
fn seal(wrap_key: &[u8; KEY_SIZE], plaintext: &[u8]) -> SealdropResult<String> {
    let cipher = XChaCha20Poly1305::new(wrap_key.into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("key wrap encryption failed: {e}"))?;

    let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);
    Ok(B64.encode(framed))
}

fn open(wrap_key: &[u8; KEY_SIZE], wrapped: &str) -> SealdropResult<Vec<u8>> {
    let framed = B64.decode(wrapped).map_err(|_| tamper_failure())?;
    if framed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(tamper_failure());
    }

    let (nonce_bytes, ciphertext) = framed.split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(wrap_key.into());

    cipher.decrypt(nonce, ciphertext).map_err(|_| tamper_failure())
}
