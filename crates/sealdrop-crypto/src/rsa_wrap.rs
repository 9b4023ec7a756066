//! RSA split-key wrapping.
//!
//! The content key (hex form) is RSA-OAEP-SHA256 encrypted under the
//! recipient's public key. The base64 ciphertext is split at a fixed offset:
//! the 16-char head is handed to the recipient as the human-facing decryption
//! key, the tail is sealed under a symmetric key that only the
//! KeyMaterialStore holds and lands in object metadata. Neither half alone —
//! nor both halves without the store — recovers the content key.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

use sealdrop_core::{KeyMaterialStore, SealdropError, SealdropResult};

use crate::key::ContentKey;

/// Length of the recipient-held fragment, in base64 characters.
pub const FRAGMENT_A_LEN: usize = 16;

/// RSA split-key wrap, parameterized by the store-side key ids.
#[derive(Debug, Clone)]
pub struct RsaKeyWrap {
    /// RSA keypair whose private half never leaves the store.
    pub rsa_key_id: String,
    /// Symmetric key sealing the ciphertext tail.
    pub sealing_key_id: String,
}

impl RsaKeyWrap {
    pub fn new(rsa_key_id: impl Into<String>, sealing_key_id: impl Into<String>) -> Self {
        Self {
            rsa_key_id: rsa_key_id.into(),
            sealing_key_id: sealing_key_id.into(),
        }
    }

    /// Wrap a content key: returns `(fragment_a, sealed_fragment_b)`.
    ///
    /// `fragment_a` goes to the caller, `sealed_fragment_b` (base64) goes to
    /// object metadata.
    pub async fn wrap(
        &self,
        kms: &dyn KeyMaterialStore,
        key: &ContentKey,
    ) -> SealdropResult<(String, String)> {
        let pem = kms.get_public_key(&self.rsa_key_id).await?;
        let public_key = RsaPublicKey::from_public_key_pem(&pem)
            .map_err(|e| SealdropError::Collaborator(format!("invalid RSA public key PEM: {e}")))?;

        let ciphertext = public_key
            .encrypt(
                &mut rand::thread_rng(),
                Oaep::new::<Sha256>(),
                key.to_hex().as_bytes(),
            )
            .map_err(|e| SealdropError::KeyWrap(format!("RSA encryption failed: {e}")))?;

        let encoded = B64.encode(&ciphertext);
        debug_assert!(encoded.len() > FRAGMENT_A_LEN);
        let (fragment_a, fragment_b) = encoded.split_at(FRAGMENT_A_LEN);

        let sealed = kms
            .symmetric_encrypt(&self.sealing_key_id, fragment_b.as_bytes())
            .await?;

        tracing::debug!(key_id = %self.rsa_key_id, "wrapped content key via RSA split-key");
        Ok((fragment_a.to_string(), B64.encode(sealed)))
    }

    /// Unwrap a content key from the recipient-held fragment and the sealed
    /// tail out of object metadata.
    ///
    /// Every sub-step failure other than an unreachable collaborator
    /// collapses to a single generic [`SealdropError::KeyWrap`]; the caller
    /// never learns which decrypt step rejected.
    pub async fn unwrap(
        &self,
        kms: &dyn KeyMaterialStore,
        fragment_a: &str,
        sealed_fragment_b: &str,
    ) -> SealdropResult<ContentKey> {
        let sealed = B64
            .decode(sealed_fragment_b)
            .map_err(|_| generic_failure())?;

        let tail_bytes = kms
            .symmetric_decrypt(&self.sealing_key_id, &sealed)
            .await
            .map_err(collapse_store_rejection)?;
        let tail = String::from_utf8(tail_bytes).map_err(|_| generic_failure())?;

        let ciphertext = B64
            .decode(format!("{fragment_a}{tail}"))
            .map_err(|_| generic_failure())?;

        let plaintext = kms
            .asymmetric_decrypt(&self.rsa_key_id, &ciphertext)
            .await
            .map_err(collapse_store_rejection)?;

        let key_hex = String::from_utf8(plaintext).map_err(|_| generic_failure())?;
        ContentKey::from_hex(&key_hex).map_err(|_| generic_failure())
    }
}

fn generic_failure() -> SealdropError {
    SealdropError::KeyWrap("wrong fragment or tampered key material".into())
}

/// Store rejections fold into the generic wrap failure; only transport-level
/// collaborator errors keep their identity.
fn collapse_store_rejection(e: SealdropError) -> SealdropError {
    match e {
        SealdropError::Collaborator(_) => e,
        _ => generic_failure(),
    }
}
