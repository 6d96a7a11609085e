//! Storage abstraction layer for Scout.
//!
//! Persistence is an opaque key → bytes store: the engine serializes its
//! snapshot to JSON and hands the bytes to a [`Storage`] backend, which is free
//! to put them anywhere. Backends can be swapped without touching the engine.
//!
//! # Storage Types
//!
//! - [`MemoryStorage`] - in-memory, for tests and temporary engines
//! - [`FileStorage`] - one file per key inside a directory
//!
//! # Example
//!
//! ```
//! use scout::storage::{MemoryStorage, Storage};
//!
//! # fn main() -> scout::error::Result<()> {
//! let storage = MemoryStorage::new();
//! storage.save("index.json", b"{}")?;
//! assert_eq!(storage.load("index.json")?, b"{}");
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// A trait for storage backends that can store and retrieve byte blobs.
///
/// Implementations must be shareable across threads so that they can be held
/// by change subscribers.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Store `bytes` under `key`, replacing any previous value.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Load the bytes stored under `key`.
    ///
    /// Returns a not-found storage error if the key does not exist.
    fn load(&self, key: &str) -> Result<Vec<u8>>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> bool;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// List all keys in sorted order.
    fn list_keys(&self) -> Result<Vec<String>>;
}
