//! File system based storage implementation.
//!
//! Each key is a file directly inside the storage directory. Writes go to a
//! temporary file that is renamed over the target, so a reader never observes
//! a half-written blob.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ScoutError};
use crate::storage::Storage;

const TEMP_SUFFIX: &str = ".tmp";

/// A file-based storage implementation.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// The directory holding one file per key.
    directory: PathBuf,
    /// Whether to fsync files before renaming them into place.
    sync_writes: bool,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(FileStorage {
            directory,
            sync_writes: true,
        })
    }

    /// Enable or disable fsync on every write.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// The storage directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, key: &str) -> Result<PathBuf> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || key.ends_with(TEMP_SUFFIX);
        if invalid {
            return Err(ScoutError::storage(format!("Invalid storage key: '{key}'")));
        }
        Ok(self.directory.join(key))
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.file_path(key)?;
        let temp_path = self.directory.join(format!("{key}{TEMP_SUFFIX}"));

        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        if self.sync_writes {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&temp_path, &path)
            .map_err(|e| ScoutError::storage(format!("Failed to rename {key}: {e}")))?;

        debug!(
            target: "scout::storage",
            key,
            bytes = bytes.len(),
            "Wrote blob"
        );
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.file_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ScoutError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.file_path(key).is_ok_and(|path| path.is_file())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.file_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.ends_with(TEMP_SUFFIX) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();

        storage.save("index.json", b"{\"a\":1}").unwrap();
        assert!(storage.exists("index.json"));
        assert_eq!(storage.load("index.json").unwrap(), b"{\"a\":1}");

        // Overwrite in place.
        storage.save("index.json", b"{}").unwrap();
        assert_eq!(storage.load("index.json").unwrap(), b"{}");
        assert_eq!(storage.list_keys().unwrap(), vec!["index.json"]);
    }

    #[test]
    fn test_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested).unwrap().with_sync_writes(false);
        storage.save("k", b"v").unwrap();
        assert!(nested.join("k").is_file());
    }

    #[test]
    fn test_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        assert!(!storage.exists("missing"));
        assert!(matches!(storage.load("missing"), Err(ScoutError::Storage(_))));
        storage.delete("missing").unwrap();
    }

    #[test]
    fn test_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        for key in ["", "..", "a/b", "a\\b", "x.tmp"] {
            assert!(storage.save(key, b"v").is_err(), "key {key:?} accepted");
        }
    }
}
