//! sealdrop-storage: OpenDAL-backed blob store for encrypted objects.
//!
//! Each stored file is two objects: the ciphertext at `<name>` and a JSON
//! metadata sidecar at `meta/<name>.json`. S3-compatible backends in
//! production; the `Memory` service stands in for tests.

pub mod names;
pub mod objects;
pub mod operator;

pub use names::resolve_object_name;
pub use objects::BlobStore;
pub use operator::build_operator;
