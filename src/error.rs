//! Error types for the Scout library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`ScoutError`] enum. Configuration mistakes are reported when an object is
//! constructed; search itself only fails when a phrase query is issued against
//! an engine that has no token history.
//!
//! # Examples
//!
//! ```
//! use scout::error::{Result, ScoutError};
//!
//! fn check_ngram(n: usize) -> Result<()> {
//!     if n == 0 {
//!         return Err(ScoutError::config("ngram must be >= 1"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_ngram(0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Scout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// I/O errors (file storage, record files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid construction-time parameters.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A record that cannot be indexed (missing id, non-string field value).
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A document id that is already present in the index.
    #[error("Document already indexed: {0}")]
    DuplicateDocument(String),

    /// Phrase queries need the raw token sequence of every document.
    #[error("Phrase queries require token history")]
    MissingTokenHistory,

    /// Storage-related errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A change subscriber failed.
    #[error("Subscriber error: {0}")]
    Subscriber(String),

    /// Generic anyhow error, mostly coming from user supplied callbacks.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ScoutError::Config(msg.into())
    }

    /// Create a new invalid record error.
    pub fn invalid_record<S: Into<String>>(msg: S) -> Self {
        ScoutError::InvalidRecord(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ScoutError::Storage(msg.into())
    }

    /// Create a new subscriber error.
    pub fn subscriber<S: Into<String>>(msg: S) -> Self {
        ScoutError::Subscriber(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        ScoutError::Storage(format!("Not found: {}", msg.into()))
    }
}
