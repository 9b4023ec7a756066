//! Blob store over an OpenDAL Operator.
//!
//! The ciphertext lives at `<name>`; its [`FileMetadata`] lives as a JSON
//! sidecar at `meta/<name>.json`, written immediately after the body.
//! Metadata is write-once: nothing in this layer mutates a sidecar after
//! upload. Neither write is transactional — a caller abandoning an upload
//! between the two leaves a body without a sidecar, which `read` reports as
//! a collaborator error rather than silently inventing metadata.

use opendal::{ErrorKind, Operator};

use sealdrop_core::{FileMetadata, SealdropError, SealdropResult};

const META_PREFIX: &str = "meta/";

pub struct BlobStore {
    op: Operator,
}

impl BlobStore {
    pub fn new(op: Operator) -> Self {
        Self { op }
    }

    /// Point lookup: does an object with this name exist?
    pub async fn exists(&self, name: &str) -> SealdropResult<bool> {
        self.op
            .exists(name)
            .await
            .map_err(|e| SealdropError::Collaborator(format!("exists({name}): {e}")))
    }

    /// Store ciphertext and its metadata sidecar.
    pub async fn write(
        &self,
        name: &str,
        bytes: Vec<u8>,
        metadata: &FileMetadata,
    ) -> SealdropResult<()> {
        let sidecar = serde_json::to_vec(metadata)
            .map_err(|e| SealdropError::Collaborator(format!("metadata encoding: {e}")))?;

        self.op
            .write(name, bytes)
            .await
            .map_err(|e| SealdropError::Collaborator(format!("write({name}): {e}")))?;
        self.op
            .write(&meta_path(name), sidecar)
            .await
            .map_err(|e| SealdropError::Collaborator(format!("write metadata({name}): {e}")))?;

        tracing::debug!(object = %name, size = metadata.size, "stored encrypted object");
        Ok(())
    }

    /// Fetch ciphertext and metadata. Absent object → [`SealdropError::NotFound`].
    pub async fn read(&self, name: &str) -> SealdropResult<(Vec<u8>, FileMetadata)> {
        let body = self.op.read(name).await.map_err(|e| read_error(name, e))?;

        let sidecar = self
            .op
            .read(&meta_path(name))
            .await
            .map_err(|e| match e.kind() {
                // Body present but sidecar missing: a half-finished upload.
                ErrorKind::NotFound => {
                    SealdropError::Collaborator(format!("metadata sidecar missing for {name}"))
                }
                _ => SealdropError::Collaborator(format!("read metadata({name}): {e}")),
            })?;

        let metadata: FileMetadata = serde_json::from_slice(&sidecar.to_vec())
            .map_err(|e| SealdropError::Collaborator(format!("metadata decoding: {e}")))?;

        Ok((body.to_vec(), metadata))
    }

    /// Fetch only the metadata sidecar. Absent sidecar → [`SealdropError::NotFound`].
    pub async fn metadata(&self, name: &str) -> SealdropResult<FileMetadata> {
        let sidecar = self
            .op
            .read(&meta_path(name))
            .await
            .map_err(|e| read_error(name, e))?;
        serde_json::from_slice(&sidecar.to_vec())
            .map_err(|e| SealdropError::Collaborator(format!("metadata decoding: {e}")))
    }

    /// Names of all stored ciphertext objects (sidecars excluded).
    pub async fn list(&self) -> SealdropResult<Vec<String>> {
        let entries = self
            .op
            .list("/")
            .await
            .map_err(|e| SealdropError::Collaborator(format!("list: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|e| e.path().to_string())
            .filter(|p| !p.starts_with(META_PREFIX) && !p.ends_with('/'))
            .collect())
    }
}

fn meta_path(name: &str) -> String {
    format!("{META_PREFIX}{name}.json")
}

fn read_error(name: &str, e: opendal::Error) -> SealdropError {
    match e.kind() {
        ErrorKind::NotFound => SealdropError::NotFound(name.to_string()),
        _ => SealdropError::Collaborator(format!("read({name}): {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealdrop_core::WrapField;

    fn memory_store() -> BlobStore {
        let op = Operator::new(opendal::services::Memory::default())
            .expect("memory operator")
            .finish();
        BlobStore::new(op)
    }

    fn sample_metadata() -> FileMetadata {
        FileMetadata {
            original_name: "notes.txt".into(),
            owner_email: "alice@example.com".into(),
            sender_name: "Bob".into(),
            mime_type: "text/plain".into(),
            size: 5,
            upload_timestamp: "1735689600".into(),
            wrap: WrapField::Ecies {
                ephemeral_public_key: "04ab".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let store = memory_store();
        let meta = sample_metadata();

        store
            .write("notes.txt.enc", b"v1:cipher".to_vec(), &meta)
            .await
            .unwrap();

        let (body, read_meta) = store.read("notes.txt.enc").await.unwrap();
        assert_eq!(body, b"v1:cipher");
        assert_eq!(read_meta, meta);
    }

    #[tokio::test]
    async fn test_read_missing_object_is_not_found() {
        let store = memory_store();
        let err = store.read("ghost.enc").await.unwrap_err();
        assert!(matches!(err, SealdropError::NotFound(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_exists() {
        let store = memory_store();
        assert!(!store.exists("a.enc").await.unwrap());
        store
            .write("a.enc", b"x".to_vec(), &sample_metadata())
            .await
            .unwrap();
        assert!(store.exists("a.enc").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_excludes_sidecars() {
        let store = memory_store();
        let meta = sample_metadata();
        store.write("a.enc", b"x".to_vec(), &meta).await.unwrap();
        store.write("b.enc", b"y".to_vec(), &meta).await.unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a.enc", "b.enc"]);
    }
}
