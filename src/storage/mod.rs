//! Storage backend abstraction for uploaded photo files.
//!
//! The application talks to a [`StorageBackend`] trait object; the only
//! shipped implementation writes to the local filesystem. Stored names are
//! derived from the blake3 hash of the content, so re-uploading the same
//! bytes is idempotent on disk.

pub mod local;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Storage operation errors.
#[derive(Debug)]
pub enum StorageError {
    /// File not found
    NotFound(String),
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

/// Trait for storage backends.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file's bytes and return the path it can be retrieved under.
    /// The original filename only contributes its extension.
    async fn put_file(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Read a stored file back.
    async fn get_file(&self, stored_path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a stored file. Removing a missing file is not an error.
    async fn delete_file(&self, stored_path: &str) -> Result<(), StorageError>;
}

static STORAGE: OnceCell<Arc<dyn StorageBackend>> = OnceCell::new();

/// Build the process-wide backend from configuration.
pub fn init() {
    let config = crate::app_config::storage();
    let backend = local::LocalStorage::new(&config.local_path);
    let _ = STORAGE.set(Arc::new(backend));
}

pub fn get_storage() -> Arc<dyn StorageBackend> {
    STORAGE
        .get()
        .expect("storage::init() has not run.")
        .clone()
}

/// Content-addressed name: blake3 hash plus the original extension.
pub fn hashed_file_name(original_name: &str, bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes).to_string();
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 8 => format!("{}.{}", hash, ext),
        _ => hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_file_name_keeps_extension() {
        let name = hashed_file_name("lunch photo.JPG", b"bytes");
        assert!(name.ends_with(".JPG"));
        assert_eq!(name.len(), 64 + 4);
    }

    #[test]
    fn test_hashed_file_name_without_extension() {
        let name = hashed_file_name("noext", b"bytes");
        assert_eq!(name.len(), 64);
    }

    #[test]
    fn test_same_bytes_same_name() {
        assert_eq!(
            hashed_file_name("a.png", b"identical"),
            hashed_file_name("b.png", b"identical")
        );
    }
}
