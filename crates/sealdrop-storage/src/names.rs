//! Collision-probing object names.
//!
//! Candidate name is `<base>.enc`; while taken, `<base>(n).enc` for
//! n = 1, 2, … — each step a point lookup. Deterministic for a given set of
//! stored names. The probe-then-write sequence is not atomic: two concurrent
//! uploads of the same base name can both see a name as free and the second
//! write wins. Making that race safe needs conditional-put semantics or a
//! single naming authority upstream of this crate.

use sealdrop_core::SealdropResult;

use crate::objects::BlobStore;

/// Resolve a free object name for `base`.
pub async fn resolve_object_name(store: &BlobStore, base: &str) -> SealdropResult<String> {
    let mut candidate = format!("{base}.enc");
    let mut n = 0u32;

    while store.exists(&candidate).await? {
        n += 1;
        candidate = format!("{base}({n}).enc");
    }

    if n > 0 {
        tracing::debug!(base = %base, resolved = %candidate, probes = n, "name collision resolved");
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::Operator;
    use sealdrop_core::{FileMetadata, WrapField};

    fn memory_store() -> BlobStore {
        let op = Operator::new(opendal::services::Memory::default())
            .expect("memory operator")
            .finish();
        BlobStore::new(op)
    }

    fn dummy_metadata() -> FileMetadata {
        FileMetadata {
            original_name: "a".into(),
            owner_email: "alice@example.com".into(),
            sender_name: "Bob".into(),
            mime_type: "application/octet-stream".into(),
            size: 1,
            upload_timestamp: "0".into(),
            wrap: WrapField::Rsa {
                sealed_fragment_b: "c2VhbGVk".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_free_base_name_untouched() {
        let store = memory_store();
        assert_eq!(resolve_object_name(&store, "a").await.unwrap(), "a.enc");
    }

    #[tokio::test]
    async fn test_single_collision_appends_one() {
        let store = memory_store();
        store
            .write("a.enc", b"x".to_vec(), &dummy_metadata())
            .await
            .unwrap();
        assert_eq!(resolve_object_name(&store, "a").await.unwrap(), "a(1).enc");
    }

    #[tokio::test]
    async fn test_probe_continues_past_taken_suffixes() {
        let store = memory_store();
        let meta = dummy_metadata();
        store.write("a.enc", b"x".to_vec(), &meta).await.unwrap();
        store.write("a(1).enc", b"x".to_vec(), &meta).await.unwrap();
        assert_eq!(resolve_object_name(&store, "a").await.unwrap(), "a(2).enc");
    }

    #[tokio::test]
    async fn test_distinct_bases_do_not_interfere() {
        let store = memory_store();
        store
            .write("a.enc", b"x".to_vec(), &dummy_metadata())
            .await
            .unwrap();
        assert_eq!(resolve_object_name(&store, "b").await.unwrap(), "b.enc");
    }
}
