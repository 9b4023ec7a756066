//! In-process KeyMaterialStore.
//!
//! Holds the RSA private key, the symmetric sealing key, and the EC
//! long-term keypair in memory, exposing only the operations of the
//! [`KeyMaterialStore`] trait — callers never see raw private key material,
//! same shape as a remote KMS. Key ids are checked so that a misconfigured
//! caller fails like it would against the real store.

use std::collections::HashMap;

use async_trait::async_trait;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::RngCore;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use sealdrop_core::config::KmsConfig;
use sealdrop_core::{KeyMaterialStore, SealdropError, SealdropResult};

const NONCE_SIZE: usize = 24;
const TAG_SIZE: usize = 16;
const RSA_BITS: usize = 2048;

pub struct LocalKeyStore {
    rsa_keys: HashMap<String, RsaPrivateKey>,
    sealing_keys: HashMap<String, [u8; 32]>,
    secrets: HashMap<(String, u32), Vec<u8>>,
}

impl LocalKeyStore {
    /// Generate a fully-populated store matching a [`KmsConfig`]: a 2048-bit
    /// RSA keypair, a 256-bit sealing key, and a secp256k1 keypair stored as
    /// two hex secret versions (public point, private scalar).
    pub fn generate(cfg: &KmsConfig) -> SealdropResult<Self> {
        let mut rng = rand::thread_rng();

        let rsa_key = RsaPrivateKey::new(&mut rng, RSA_BITS)
            .map_err(|e| SealdropError::Collaborator(format!("RSA key generation: {e}")))?;

        let mut sealing_key = [0u8; 32];
        rng.fill_bytes(&mut sealing_key);

        let ecc_key = k256::SecretKey::random(&mut rng);
        let ecc_public_hex = hex::encode(ecc_key.public_key().to_encoded_point(false).as_bytes());
        let ecc_private_hex = hex::encode(ecc_key.to_bytes());

        let mut store = Self {
            rsa_keys: HashMap::new(),
            sealing_keys: HashMap::new(),
            secrets: HashMap::new(),
        };
        store.rsa_keys.insert(cfg.rsa_key_id.clone(), rsa_key);
        store
            .sealing_keys
            .insert(cfg.sealing_key_id.clone(), sealing_key);
        store.secrets.insert(
            (cfg.ecc_secret_id.clone(), cfg.ecc_public_version),
            ecc_public_hex.into_bytes(),
        );
        store.secrets.insert(
            (cfg.ecc_secret_id.clone(), cfg.ecc_private_version),
            ecc_private_hex.into_bytes(),
        );

        tracing::debug!(
            rsa_key_id = %cfg.rsa_key_id,
            ecc_secret_id = %cfg.ecc_secret_id,
            "generated in-process key store"
        );
        Ok(store)
    }

    fn rsa_key(&self, key_id: &str) -> SealdropResult<&RsaPrivateKey> {
        self.rsa_keys
            .get(key_id)
            .ok_or_else(|| SealdropError::Collaborator(format!("unknown asymmetric key: {key_id}")))
    }

    fn sealing_key(&self, key_id: &str) -> SealdropResult<&[u8; 32]> {
        self.sealing_keys
            .get(key_id)
            .ok_or_else(|| SealdropError::Collaborator(format!("unknown symmetric key: {key_id}")))
    }
}

#[async_trait]
impl KeyMaterialStore for LocalKeyStore {
    async fn get_public_key(&self, key_id: &str) -> SealdropResult<String> {
        let public = RsaPublicKey::from(self.rsa_key(key_id)?);
        public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SealdropError::Collaborator(format!("PEM encoding: {e}")))
    }

    async fn asymmetric_decrypt(
        &self,
        key_id: &str,
        ciphertext: &[u8],
    ) -> SealdropResult<Vec<u8>> {
        self.rsa_key(key_id)?
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| SealdropError::KeyWrap("asymmetric decrypt rejected".into()))
    }

    async fn symmetric_encrypt(&self, key_id: &str, plaintext: &[u8]) -> SealdropResult<Vec<u8>> {
        let cipher = XChaCha20Poly1305::new(self.sealing_key(key_id)?.into());

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| SealdropError::Collaborator(format!("symmetric encrypt: {e}")))?;

        let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        framed.extend_from_slice(&nonce_bytes);
        framed.extend_from_slice(&ciphertext);
        Ok(framed)
    }

    async fn symmetric_decrypt(&self, key_id: &str, ciphertext: &[u8]) -> SealdropResult<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(SealdropError::KeyWrap("symmetric decrypt rejected".into()));
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_SIZE);
        let nonce = XNonce::from_slice(nonce_bytes);
        let cipher = XChaCha20Poly1305::new(self.sealing_key(key_id)?.into());

        cipher
            .decrypt(nonce, body)
            .map_err(|_| SealdropError::KeyWrap("symmetric decrypt rejected".into()))
    }

    async fn get_secret(&self, secret_id: &str, version: u32) -> SealdropResult<Vec<u8>> {
        self.secrets
            .get(&(secret_id.to_string(), version))
            .cloned()
            .ok_or_else(|| {
                SealdropError::Collaborator(format!("unknown secret: {secret_id} v{version}"))
            })
    }
}
