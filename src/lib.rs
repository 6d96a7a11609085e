//! # Scout
//!
//! An embeddable full-text search engine for JSON records.
//!
//! ## Features
//!
//! - Unicode word tokenizer with optional word n-grams and stop words
//! - Inverted index with deterministic JSON snapshots
//! - Small query language: required terms, `OR`, `-exclusion` and `"phrases"`
//! - Pluggable ranking: TF, TF-IDF, BM25, weighted fusion and recency decay
//! - Change notification for incremental persistence
//! - Pluggable storage backends
//!
//! ## Example
//!
//! ```
//! use scout::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> scout::error::Result<()> {
//! let records: Vec<Record> = vec![
//!     serde_json::from_value(json!({"id": "1", "text": "apple banana"}))?,
//!     serde_json::from_value(json!({"id": "2", "text": "orange pear"}))?,
//! ];
//! let engine = SearchEngine::from_records(records, Box::new(Bm25Ranking::default()), SearchConfig::new())?;
//!
//! assert_eq!(engine.search("apple OR orange", 10)?.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod ranking;
pub mod search;
pub mod state;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::{StopWords, Tokenizer};
    pub use crate::document::{Record, load_records};
    pub use crate::error::{Result, ScoutError};
    pub use crate::index::{InvertedIndex, RecordPolicy};
    pub use crate::query::{ParsedQuery, QueryParser};
    pub use crate::ranking::{
        Bm25Ranking, CompositeRanking, FusionRanking, RankingResult, RankingStrategy, RecencyRanking,
        RobustRanking, TermFrequencyRanking, TfIdfRanking,
    };
    pub use crate::search::{SearchConfig, SearchEngine, SearchHit, explain_query};
    pub use crate::state::{AutoSaver, IndexState};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
