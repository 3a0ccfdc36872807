//! Credential storage for the Passage app core.
//!
//! This crate provides:
//! - A `SecureStorage` trait over simple key-value backends
//! - A file-backed implementation that mirrors the hosting platform's
//!   key-value store layout
//! - A typed `CredentialStore` facade over the well-known credential keys

mod credentials;
mod file;
mod keys;
mod traits;

pub use credentials::{CredentialStore, RegistrationRecord, SessionRecord};
pub use file::FileStorage;
pub use keys::StorageKeys;
pub use traits::SecureStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage at the given path.
pub fn create_storage(path: PathBuf) -> StorageResult<Box<dyn SecureStorage>> {
    let storage = FileStorage::open(path)?;
    Ok(Box::new(storage))
}

/// Create a CredentialStore backed by the default file storage.
pub fn create_credential_store(path: PathBuf) -> StorageResult<CredentialStore> {
    let storage = create_storage(path)?;
    Ok(CredentialStore::new(storage))
}
