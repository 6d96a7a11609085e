//! Inverted index, corpus statistics and the record-to-index builder.
//!
//! # Core Components
//!
//! - [`InvertedIndex`] - token → postings storage with document frequencies,
//!   per-document metadata and length statistics
//! - [`IndexStats`] - document lengths and counts used by ranking
//! - [`IndexSnapshot`] - deterministic, JSON-compatible image of an index
//! - [`IndexBuilder`] - turns records into token sequences (field weighting,
//!   stop words) and builds an [`IndexState`](crate::state::IndexState)

pub mod builder;
pub mod inverted;
pub mod stats;

pub use builder::{IndexBuilder, RecordPolicy};
pub use inverted::{IndexSnapshot, InvertedIndex, Posting};
pub use stats::IndexStats;
