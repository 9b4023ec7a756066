//! OpenDAL Operator factory for sealdrop storage backends.

use anyhow::{Context, Result};
use opendal::Operator;

use sealdrop_core::config::StorageConfig;

/// Build an OpenDAL Operator for any S3-compatible endpoint.
///
/// Uses path-style addressing (default in opendal 0.55), which MinIO and
/// SeaweedFS require. If `enforce_tls` is set and the endpoint uses HTTP,
/// this returns an error; otherwise a plaintext endpoint only logs a warning.
pub fn build_operator(
    cfg: &StorageConfig,
    access_key_id: &str,
    secret_access_key: &str,
) -> Result<Operator> {
    if cfg.endpoint.starts_with("http://") {
        if cfg.enforce_tls {
            anyhow::bail!(
                "storage endpoint uses plaintext HTTP ({}), but enforce_tls is enabled. \
                 Use an HTTPS endpoint or set storage.enforce_tls = false for local development.",
                cfg.endpoint
            );
        }
        tracing::warn!(
            endpoint = %cfg.endpoint,
            "storage endpoint uses plaintext HTTP — credentials and ciphertext are \
             transmitted unencrypted. Set storage.enforce_tls = true and use HTTPS in production."
        );
    }

    let builder = opendal::services::S3::default()
        .endpoint(&cfg.endpoint)
        .region(&cfg.region)
        .bucket(&cfg.bucket)
        .access_key_id(access_key_id)
        .secret_access_key(secret_access_key);

    let op = Operator::new(builder)
        .context("creating OpenDAL S3 operator")?
        .layer(opendal::layers::LoggingLayer::default())
        .layer(
            opendal::layers::RetryLayer::new()
                .with_max_times(5)
                .with_jitter(),
        )
        .finish();

    Ok(op)
}
