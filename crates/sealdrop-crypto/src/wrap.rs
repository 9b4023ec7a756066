//! Scheme-agnostic key wrapping: a tagged union over the RSA split-key and
//! ECIES paths, so the content codec and storage layers never branch on
//! which scheme is active.

use serde::{Deserialize, Serialize};

use sealdrop_core::config::KmsConfig;
use sealdrop_core::{KeyMaterialStore, SealdropError, SealdropResult, WrapField};

use crate::ecies::EciesKeyWrap;
use crate::key::ContentKey;
use crate::rsa_wrap::RsaKeyWrap;

/// Which wrap protocol an upload path uses. One scheme per stored object,
/// never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapScheme {
    Rsa,
    Ecies,
}

/// A wrapped content key, split into the recipient-held half and the half
/// that persists in object metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedKey {
    Rsa {
        fragment_a: String,
        sealed_fragment_b: String,
    },
    Ecies {
        wrapped_key: String,
        ephemeral_public_key: String,
    },
}

impl WrappedKey {
    /// The half returned to the caller: the human-facing decryption key.
    pub fn recipient_secret(&self) -> &str {
        match self {
            WrappedKey::Rsa { fragment_a, .. } => fragment_a,
            WrappedKey::Ecies { wrapped_key, .. } => wrapped_key,
        }
    }

    /// The half safe to persist in object metadata.
    pub fn metadata_field(&self) -> WrapField {
        match self {
            WrappedKey::Rsa {
                sealed_fragment_b, ..
            } => WrapField::Rsa {
                sealed_fragment_b: sealed_fragment_b.clone(),
            },
            WrappedKey::Ecies {
                ephemeral_public_key,
                ..
            } => WrapField::Ecies {
                ephemeral_public_key: ephemeral_public_key.clone(),
            },
        }
    }

    pub fn scheme(&self) -> WrapScheme {
        match self {
            WrappedKey::Rsa { .. } => WrapScheme::Rsa,
            WrappedKey::Ecies { .. } => WrapScheme::Ecies,
        }
    }
}

/// A configured wrap protocol instance.
#[derive(Debug, Clone)]
pub enum KeyWrapper {
    Rsa(RsaKeyWrap),
    Ecies(EciesKeyWrap),
}

impl KeyWrapper {
    pub fn new(scheme: WrapScheme, cfg: &KmsConfig) -> Self {
        match scheme {
            WrapScheme::Rsa => KeyWrapper::Rsa(RsaKeyWrap::new(
                cfg.rsa_key_id.clone(),
                cfg.sealing_key_id.clone(),
            )),
            WrapScheme::Ecies => KeyWrapper::Ecies(EciesKeyWrap::new(
                cfg.ecc_secret_id.clone(),
                cfg.ecc_public_version,
                cfg.ecc_private_version,
            )),
        }
    }

    /// Pick the wrapper matching a stored metadata field.
    pub fn for_field(field: &WrapField, cfg: &KmsConfig) -> Self {
        match field {
            WrapField::Rsa { .. } => Self::new(WrapScheme::Rsa, cfg),
            WrapField::Ecies { .. } => Self::new(WrapScheme::Ecies, cfg),
        }
    }

    pub async fn wrap(
        &self,
        kms: &dyn KeyMaterialStore,
        key: &ContentKey,
    ) -> SealdropResult<WrappedKey> {
        match self {
            KeyWrapper::Rsa(w) => {
                let (fragment_a, sealed_fragment_b) = w.wrap(kms, key).await?;
                Ok(WrappedKey::Rsa {
                    fragment_a,
                    sealed_fragment_b,
                })
            }
            KeyWrapper::Ecies(w) => {
                let (wrapped_key, ephemeral_public_key) = w.wrap(kms, key).await?;
                Ok(WrappedKey::Ecies {
                    wrapped_key,
                    ephemeral_public_key,
                })
            }
        }
    }

    /// Recover a content key from the caller-held secret and the metadata
    /// field. A scheme mismatch between the two is a wrap failure, not a
    /// panic.
    pub async fn unwrap(
        &self,
        kms: &dyn KeyMaterialStore,
        recipient_secret: &str,
        field: &WrapField,
    ) -> SealdropResult<ContentKey> {
        match (self, field) {
            (KeyWrapper::Rsa(w), WrapField::Rsa { sealed_fragment_b }) => {
                w.unwrap(kms, recipient_secret, sealed_fragment_b).await
            }
            (KeyWrapper::Ecies(w), WrapField::Ecies { ephemeral_public_key }) => {
                w.unwrap(kms, recipient_secret, ephemeral_public_key).await
            }
            _ => Err(SealdropError::KeyWrap("wrap scheme mismatch".into())),
        }
    }
}
