//! Search functionality.
//!
//! [`SearchEngine`] ties the pieces together: records are turned into token
//! sequences by the [`IndexBuilder`](crate::index::IndexBuilder), indexed,
//! and queried with the mini-language of [`crate::query`]. Query evaluation
//! runs in a fixed order:
//!
//! 1. parse the query and drop stop words
//! 2. collect candidates from the postings of the required and optional
//!    terms (or of the phrase words when there are none)
//! 3. filter on excluded terms, required terms (or any term when the query
//!    contains `OR`) and phrases
//! 4. score with the configured ranking, drop zero scores, sort and truncate

pub mod config;
pub mod engine;
pub mod explain;

pub use config::{DEFAULT_FIELD, MAX_FIELD_WEIGHT, SearchConfig};
pub use engine::{DEFAULT_LIMIT, EngineSnapshot, PersistedConfig, SearchEngine, SearchHit};
pub use explain::explain_query;
