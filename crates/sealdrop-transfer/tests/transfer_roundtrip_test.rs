//! End-to-end upload/download flows against an in-memory blob store and an
//! in-process key store.

use opendal::Operator;
use sealdrop_core::config::SealdropConfig;
use sealdrop_core::{SealdropError, WrapField};
use sealdrop_crypto::WrapScheme;
use sealdrop_kms::LocalKeyStore;
use sealdrop_storage::BlobStore;
use sealdrop_transfer::{download, list_for_recipient, upload, UploadRequest};

fn memory_store() -> BlobStore {
    let op = Operator::new(opendal::services::Memory::default())
        .expect("memory operator")
        .finish();
    BlobStore::new(op)
}

fn test_config() -> SealdropConfig {
    SealdropConfig::default()
}

fn request<'a>(content: &'a [u8]) -> UploadRequest<'a> {
    UploadRequest {
        file_name: "report.pdf",
        mime_type: "application/pdf",
        owner_email: "alice@example.com",
        sender_name: "Bob",
        content,
    }
}

#[tokio::test]
async fn ecies_upload_download_roundtrip() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    // The 10-byte scenario: encrypt, wrap via ECIES, store, then recover
    // using only the stored metadata and the caller-held wrapped key.
    let original = b"ten bytes!";
    let receipt = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(original))
        .await
        .expect("upload should succeed");

    assert_eq!(receipt.object_name, "report.pdf.enc");

    let fetched = download(&store, &kms, &cfg, &receipt.object_name, &receipt.access_key)
        .await
        .expect("download should succeed");

    assert_eq!(fetched.content, original);
    assert_eq!(fetched.metadata.original_name, "report.pdf");
    assert_eq!(fetched.metadata.size, 10);
    assert!(matches!(fetched.metadata.wrap, WrapField::Ecies { .. }));
}

#[tokio::test]
async fn rsa_upload_download_roundtrip() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let original = b"split-key wrapped payload";
    let receipt = upload(&store, &kms, &cfg, WrapScheme::Rsa, request(original))
        .await
        .unwrap();

    // The caller-visible key is the 16-char base64 head of the RSA ciphertext.
    assert_eq!(receipt.access_key.len(), 16);

    let fetched = download(&store, &kms, &cfg, &receipt.object_name, &receipt.access_key)
        .await
        .unwrap();
    assert_eq!(fetched.content, original);
    assert!(matches!(fetched.metadata.wrap, WrapField::Rsa { .. }));
}

#[tokio::test]
async fn wrong_access_key_is_a_wrap_failure() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let receipt = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"secret"))
        .await
        .unwrap();

    // A different upload's access key must not decrypt this object.
    let other = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"other"))
        .await
        .unwrap();

    let err = download(&store, &kms, &cfg, &receipt.object_name, &other.access_key)
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::KeyWrap(_)), "got: {err}");
}

#[tokio::test]
async fn corrupted_sealed_fragment_is_a_wrap_failure_not_a_crash() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let receipt = upload(&store, &kms, &cfg, WrapScheme::Rsa, request(b"secret"))
        .await
        .unwrap();

    // Tamper with the stored metadata: corrupt the sealed fragment.
    let (body, mut metadata) = store.read(&receipt.object_name).await.unwrap();
    metadata.wrap = match metadata.wrap {
        WrapField::Rsa { sealed_fragment_b } => {
            let mut s = sealed_fragment_b.into_bytes();
            let i = s.len() / 2;
            s[i] = if s[i] == b'A' { b'B' } else { b'A' };
            WrapField::Rsa {
                sealed_fragment_b: String::from_utf8(s).unwrap(),
            }
        }
        other => other,
    };
    store
        .write(&receipt.object_name, body, &metadata)
        .await
        .unwrap();

    let err = download(&store, &kms, &cfg, &receipt.object_name, &receipt.access_key)
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::KeyWrap(_)), "got: {err}");
}

#[tokio::test]
async fn corrupted_ciphertext_is_an_integrity_failure() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let receipt = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"payload"))
        .await
        .unwrap();

    let (mut body, metadata) = store.read(&receipt.object_name).await.unwrap();
    let i = body.len() - 2;
    body[i] = if body[i] == b'A' { b'B' } else { b'A' };
    store
        .write(&receipt.object_name, body, &metadata)
        .await
        .unwrap();

    let err = download(&store, &kms, &cfg, &receipt.object_name, &receipt.access_key)
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::Integrity), "got: {err}");
}

#[tokio::test]
async fn download_of_missing_object_is_not_found() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let err = download(&store, &kms, &cfg, "ghost.enc", "irrelevant")
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::NotFound(_)));
}

#[tokio::test]
async fn repeated_uploads_probe_for_free_names() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let first = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"one"))
        .await
        .unwrap();
    let second = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"two"))
        .await
        .unwrap();
    let third = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"three"))
        .await
        .unwrap();

    assert_eq!(first.object_name, "report.pdf.enc");
    assert_eq!(second.object_name, "report.pdf(1).enc");
    assert_eq!(third.object_name, "report.pdf(2).enc");

    // Each object still decrypts with its own access key.
    let fetched = download(&store, &kms, &cfg, &second.object_name, &second.access_key)
        .await
        .unwrap();
    assert_eq!(fetched.content, b"two");
}

#[tokio::test]
async fn listing_filters_by_recipient() {
    let store = memory_store();
    let cfg = test_config();
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b"for alice"))
        .await
        .unwrap();
    upload(
        &store,
        &kms,
        &cfg,
        WrapScheme::Rsa,
        UploadRequest {
            file_name: "carol.txt",
            mime_type: "text/plain",
            owner_email: "carol@example.com",
            sender_name: "Bob",
            content: b"for carol",
        },
    )
    .await
    .unwrap();

    let alice = list_for_recipient(&store, "alice@example.com").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].metadata.original_name, "report.pdf");

    let carol = list_for_recipient(&store, "carol@example.com").await.unwrap();
    assert_eq!(carol.len(), 1);
    assert_eq!(carol[0].object_name, "carol.txt.enc");

    let nobody = list_for_recipient(&store, "mallory@example.com").await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn empty_and_oversized_uploads_are_rejected() {
    let store = memory_store();
    let mut cfg = test_config();
    cfg.transfer.max_file_size = 64;
    let kms = LocalKeyStore::generate(&cfg.kms).unwrap();

    let err = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(b""))
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::InvalidInput(_)));

    let big = vec![0u8; 65];
    let err = upload(&store, &kms, &cfg, WrapScheme::Ecies, request(&big))
        .await
        .unwrap_err();
    assert!(matches!(err, SealdropError::InvalidInput(_)));

    // Nothing was stored.
    assert!(store.list().await.unwrap().is_empty());
}
