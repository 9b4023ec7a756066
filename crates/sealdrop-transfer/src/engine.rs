//! Upload/download flows tying codec, key wrap, and storage together.
//!
//! Every call is stateless and call-scoped: the content key exists only in
//! memory for the duration of the call, and in wrapped form afterwards.
//! Collaborator calls are the only awaits; nothing is retried here and a
//! partial upload (body written, caller gone before the sidecar) is not
//! rolled back.

use std::time::{SystemTime, UNIX_EPOCH};

use sealdrop_core::config::SealdropConfig;
use sealdrop_core::{FileMetadata, KeyMaterialStore, SealdropError, SealdropResult};
use sealdrop_crypto::{decrypt_content, encrypt_content, ContentKey, KeyWrapper, WrapScheme};
use sealdrop_storage::{resolve_object_name, BlobStore};

/// A file handed to [`upload`].
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    /// Name the sender gave the file; the stored object gets `.enc` appended.
    pub file_name: &'a str,
    pub mime_type: &'a str,
    /// Recipient's email, recorded for listing.
    pub owner_email: &'a str,
    pub sender_name: &'a str,
    pub content: &'a [u8],
}

/// What the caller gets back from an upload. `access_key` is the
/// recipient-held key half; it is never persisted server-side.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub object_name: String,
    pub access_key: String,
}

/// A decrypted download.
#[derive(Debug)]
pub struct Download {
    pub content: Vec<u8>,
    pub metadata: FileMetadata,
}

/// A listing entry for a recipient.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub object_name: String,
    pub metadata: FileMetadata,
}

/// Encrypt and store a file for one recipient under the given wrap scheme.
pub async fn upload(
    store: &BlobStore,
    kms: &dyn KeyMaterialStore,
    cfg: &SealdropConfig,
    scheme: WrapScheme,
    request: UploadRequest<'_>,
) -> SealdropResult<UploadReceipt> {
    if request.content.is_empty() {
        return Err(SealdropError::InvalidInput("file is empty".into()));
    }
    if request.content.len() as u64 > cfg.transfer.max_file_size {
        return Err(SealdropError::InvalidInput(format!(
            "file exceeds the maximum allowed size of {} bytes",
            cfg.transfer.max_file_size
        )));
    }

    let key = ContentKey::generate();
    let ciphertext = encrypt_content(request.content, &key)?;

    let wrapped = KeyWrapper::new(scheme, &cfg.kms).wrap(kms, &key).await?;

    let object_name = resolve_object_name(store, request.file_name).await?;

    let metadata = FileMetadata {
        original_name: request.file_name.to_string(),
        owner_email: request.owner_email.to_string(),
        sender_name: request.sender_name.to_string(),
        mime_type: request.mime_type.to_string(),
        size: request.content.len() as u64,
        upload_timestamp: unix_timestamp(),
        wrap: wrapped.metadata_field(),
    };

    store
        .write(&object_name, ciphertext.into_bytes(), &metadata)
        .await?;

    tracing::info!(
        object = %object_name,
        recipient = %request.owner_email,
        size = request.content.len(),
        scheme = ?scheme,
        "uploaded encrypted file"
    );

    Ok(UploadReceipt {
        object_name,
        access_key: wrapped.recipient_secret().to_string(),
    })
}

/// Fetch, unwrap, and decrypt a stored file using the caller-held key half.
pub async fn download(
    store: &BlobStore,
    kms: &dyn KeyMaterialStore,
    cfg: &SealdropConfig,
    object_name: &str,
    access_key: &str,
) -> SealdropResult<Download> {
    let (body, metadata) = store.read(object_name).await?;
    let ciphertext = String::from_utf8(body).map_err(|_| SealdropError::Integrity)?;

    let wrapper = KeyWrapper::for_field(&metadata.wrap, &cfg.kms);
    let key = wrapper.unwrap(kms, access_key, &metadata.wrap).await?;

    let content = decrypt_content(&ciphertext, &key)?;

    tracing::info!(object = %object_name, size = content.len(), "downloaded and decrypted file");
    Ok(Download { content, metadata })
}

/// All stored files addressed to `owner_email`.
///
/// Objects with an unreadable or missing sidecar are skipped with a warning,
/// so one half-finished upload does not break the whole listing.
pub async fn list_for_recipient(
    store: &BlobStore,
    owner_email: &str,
) -> SealdropResult<Vec<ReceivedFile>> {
    let mut received = Vec::new();

    for object_name in store.list().await? {
        match store.metadata(&object_name).await {
            Ok(metadata) if metadata.owner_email == owner_email => {
                received.push(ReceivedFile {
                    object_name,
                    metadata,
                });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(object = %object_name, error = %e, "skipping object without readable metadata");
            }
        }
    }

    Ok(received)
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
