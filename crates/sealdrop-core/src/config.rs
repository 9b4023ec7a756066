use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SealdropError, SealdropResult};

/// Top-level configuration (loaded from sealdrop.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SealdropConfig {
    pub storage: StorageConfig,
    pub kms: KmsConfig,
    pub transfer: TransferConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// S3-compatible endpoint
    pub endpoint: String,
    /// S3 region (default: us-east-1)
    pub region: String,
    /// Bucket holding encrypted objects and their metadata sidecars
    pub bucket: String,
    /// Enforce HTTPS for storage connections (warn/error on HTTP endpoints)
    pub enforce_tls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KmsConfig {
    /// Key id of the RSA keypair whose private half stays in the store
    pub rsa_key_id: String,
    /// Key id of the symmetric key sealing the RSA ciphertext tail
    pub sealing_key_id: String,
    /// Secret id of the EC long-term keypair
    pub ecc_secret_id: String,
    /// Secret version holding the EC public point (hex SEC1)
    pub ecc_public_version: u32,
    /// Secret version holding the EC private scalar (hex)
    pub ecc_private_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Upload size ceiling in bytes (default: 25 MiB)
    pub max_file_size: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000".into(),
            region: "us-east-1".into(),
            bucket: "sealdrop".into(),
            enforce_tls: false,
        }
    }
}

impl Default for KmsConfig {
    fn default() -> Self {
        Self {
            rsa_key_id: "sealdrop-rsa".into(),
            sealing_key_id: "sealdrop-seal".into(),
            ecc_secret_id: "sealdrop-ecc".into(),
            ecc_public_version: 1,
            ecc_private_version: 2,
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_file_size: 25 * 1024 * 1024,
        }
    }
}

impl SealdropConfig {
    /// Load configuration from a TOML file. Missing sections fall back to
    /// their defaults.
    pub fn load(path: &Path) -> SealdropResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| SealdropError::Config(e.to_string()))
    }
}
