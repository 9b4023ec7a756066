//! sealdrop-transfer: the upload/download engine.
//!
//! Upload: fresh content key → marker envelope → wrap (RSA split-key or
//! ECIES) → collision-free object name → body + metadata sidecar into the
//! blob store; the recipient-held key half comes back to the caller.
//!
//! Download: read body + metadata → unwrap with the caller's key half and
//! the metadata field → decrypt and verify the envelope.

pub mod engine;

pub use engine::{
    download, list_for_recipient, upload, Download, ReceivedFile, UploadReceipt, UploadRequest,
};
