//! KeyMaterialStore: the remote KMS/secret-manager trust boundary.
//!
//! Long-term private keys never cross this boundary in the RSA path: the
//! store performs `asymmetric_decrypt` on our behalf. The EC longterm keypair
//! is fetched as versioned secret material (`get_secret`), mirroring a
//! secret-manager that stores the public and private halves as two versions.
//!
//! The trait is injected into every wrap/unwrap call rather than held as
//! process-global state, so tests substitute an in-process double.

use async_trait::async_trait;

use crate::error::SealdropResult;

#[async_trait]
pub trait KeyMaterialStore: Send + Sync {
    /// Fetch the PEM-encoded public half of an asymmetric key.
    async fn get_public_key(&self, key_id: &str) -> SealdropResult<String>;

    /// Decrypt `ciphertext` with the private half of `key_id`, remotely.
    async fn asymmetric_decrypt(&self, key_id: &str, ciphertext: &[u8])
        -> SealdropResult<Vec<u8>>;

    /// Encrypt `plaintext` under a symmetric key held only by the store.
    async fn symmetric_encrypt(&self, key_id: &str, plaintext: &[u8])
        -> SealdropResult<Vec<u8>>;

    /// Reverse of [`symmetric_encrypt`](Self::symmetric_encrypt).
    async fn symmetric_decrypt(&self, key_id: &str, ciphertext: &[u8])
        -> SealdropResult<Vec<u8>>;

    /// Fetch raw secret material by id and version.
    async fn get_secret(&self, secret_id: &str, version: u32) -> SealdropResult<Vec<u8>>;
}
