//! Local filesystem storage backend.

use super::{hashed_file_name, StorageBackend, StorageError};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, stored_path: &str) -> Result<PathBuf, StorageError> {
        // Stored paths are generated by put_file; anything with a separator
        // or parent component did not come from us.
        if stored_path.contains('/') || stored_path.contains('\\') || stored_path.contains("..") {
            return Err(StorageError::NotFound(stored_path.to_owned()));
        }
        Ok(self.root.join(stored_path))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn put_file(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        std::fs::create_dir_all(&self.root)?;
        let stored_name = hashed_file_name(original_name, bytes);
        let path = self.root.join(&stored_name);
        std::fs::write(path, bytes)?;
        Ok(stored_name)
    }

    async fn get_file(&self, stored_path: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.full_path(stored_path)?;
        Ok(std::fs::read(path)?)
    }

    async fn delete_file(&self, stored_path: &str) -> Result<(), StorageError> {
        let path = self.full_path(stored_path)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
