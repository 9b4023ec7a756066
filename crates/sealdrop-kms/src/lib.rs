//! sealdrop-kms: KeyMaterialStore backends.
//!
//! Production deployments point the trait at a remote KMS/secret-manager;
//! this crate ships the in-process backend used for local deployments and as
//! the test double the wrap protocols are exercised against.

pub mod local;

pub use local::LocalKeyStore;
