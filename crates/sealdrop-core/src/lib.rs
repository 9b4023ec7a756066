pub mod config;
pub mod error;
pub mod kms;
pub mod types;

pub use error::{SealdropError, SealdropResult};
pub use kms::KeyMaterialStore;
pub use types::{FileMetadata, WrapField};
