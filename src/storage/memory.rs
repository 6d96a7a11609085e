//! In-memory storage implementation for testing and temporary engines.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{Result, ScoutError};
use crate::storage::Storage;

#[derive(Debug, Default)]
struct MemoryFiles {
    blobs: HashMap<String, Vec<u8>>,
    writes: u64,
}

/// An in-memory storage implementation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<MemoryFiles>,
}

impl MemoryStorage {
    /// Create a new, empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.files.lock().blobs.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.lock().blobs.is_empty()
    }

    /// Total size of all stored blobs in bytes.
    pub fn total_size(&self) -> u64 {
        let files = self.files.lock();
        files.blobs.values().map(|data| data.len() as u64).sum()
    }

    /// Number of `save` calls served so far.
    pub fn write_count(&self) -> u64 {
        self.files.lock().writes
    }

    /// Remove every key.
    pub fn clear(&self) {
        self.files.lock().blobs.clear();
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut files = self.files.lock();
        files.blobs.insert(key.to_string(), bytes.to_vec());
        files.writes += 1;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .blobs
            .get(key)
            .cloned()
            .ok_or_else(|| ScoutError::not_found(key))
    }

    fn exists(&self, key: &str) -> bool {
        self.files.lock().blobs.contains_key(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.files.lock().blobs.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.files.lock().blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        storage.save("a", b"hello").unwrap();
        storage.save("a", b"world").unwrap();

        assert_eq!(storage.load("a").unwrap(), b"world");
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.total_size(), 5);
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("nope"));
        assert!(matches!(storage.load("nope"), Err(ScoutError::Storage(_))));
    }

    #[test]
    fn test_delete_and_list() {
        let storage = MemoryStorage::new();
        storage.save("b", b"2").unwrap();
        storage.save("a", b"1").unwrap();
        assert_eq!(storage.list_keys().unwrap(), vec!["a", "b"]);

        storage.delete("a").unwrap();
        storage.delete("missing").unwrap();
        assert_eq!(storage.list_keys().unwrap(), vec!["b"]);

        storage.clear();
        assert!(storage.is_empty());
    }
}
