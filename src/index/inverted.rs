//! Posting lists and inverted index implementation.
//!
//! Postings are appended in insertion order, one per `add_document` call that
//! contains the token, so `doc_freqs[token]` always equals the length of the
//! token's postings list. Positions are not kept; phrase matching relies on
//! the raw token sequences held by [`IndexState`](crate::state::IndexState).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Record;
use crate::error::{Result, ScoutError};
use crate::index::stats::IndexStats;

/// A single posting: a document and the token's frequency in it.
///
/// Serialized as a two-element array `[doc_id, freq]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u32)", into = "(String, u32)")]
pub struct Posting {
    /// Document ID.
    pub doc_id: String,
    /// Term frequency in the document.
    pub frequency: u32,
}

impl Posting {
    /// Create a posting with frequency.
    pub fn new<S: Into<String>>(doc_id: S, frequency: u32) -> Self {
        Posting {
            doc_id: doc_id.into(),
            frequency,
        }
    }
}

impl From<(String, u32)> for Posting {
    fn from((doc_id, frequency): (String, u32)) -> Self {
        Posting { doc_id, frequency }
    }
}

impl From<Posting> for (String, u32) {
    fn from(posting: Posting) -> Self {
        (posting.doc_id, posting.frequency)
    }
}

/// Deterministic, JSON-compatible image of an [`InvertedIndex`].
///
/// All maps are ordered, so serializing the same index twice produces the same
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// token → postings, in population order.
    pub index: BTreeMap<String, Vec<Posting>>,
    /// token → number of postings.
    pub doc_freqs: BTreeMap<String, usize>,
    /// document id → metadata.
    pub documents: BTreeMap<String, Record>,
    /// Corpus statistics.
    pub stats: IndexStats,
}

/// Inverted index mapping tokens to postings lists.
///
/// # Examples
///
/// ```
/// use scout::index::InvertedIndex;
///
/// let mut index = InvertedIndex::new();
/// let tokens: Vec<String> = ["fox", "jumps", "fox"].iter().map(|s| s.to_string()).collect();
/// index.add_document("1", &tokens, Default::default()).unwrap();
///
/// assert_eq!(index.get_postings("fox")[0].frequency, 2);
/// assert_eq!(index.doc_freq("fox"), 1);
/// assert!(index.document_contains("1", "jumps"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    doc_freqs: HashMap<String, usize>,
    documents: HashMap<String, Record>,
    stats: IndexStats,
}

impl InvertedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    ///
    /// Computes a term-frequency histogram of `tokens`, appends one posting
    /// per distinct token, stores `metadata` and records the document length.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::DuplicateDocument`] if `doc_id` is already
    /// indexed; the index is left untouched in that case.
    pub fn add_document<S: Into<String>>(
        &mut self,
        doc_id: S,
        tokens: &[String],
        metadata: Record,
    ) -> Result<()> {
        let doc_id = doc_id.into();
        if self.contains_document(&doc_id) {
            return Err(ScoutError::DuplicateDocument(doc_id));
        }

        let mut histogram: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *histogram.entry(token.as_str()).or_insert(0) += 1;
        }

        for (token, frequency) in histogram {
            self.postings
                .entry(token.to_string())
                .or_default()
                .push(Posting::new(doc_id.clone(), frequency));
            *self.doc_freqs.entry(token.to_string()).or_insert(0) += 1;
        }

        self.stats.add_document(&doc_id, tokens.len());
        self.documents.insert(doc_id, metadata);
        Ok(())
    }

    /// Postings for a token in population order, empty if the token is unknown.
    pub fn get_postings(&self, token: &str) -> &[Posting] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Frequency of `token` in `doc_id`, 0 if absent.
    pub fn term_frequency(&self, doc_id: &str, token: &str) -> u32 {
        self.get_postings(token)
            .iter()
            .find(|posting| posting.doc_id == doc_id)
            .map_or(0, |posting| posting.frequency)
    }

    /// Whether `doc_id` contains `token` (linear scan of the postings).
    pub fn document_contains(&self, doc_id: &str, token: &str) -> bool {
        self.get_postings(token)
            .iter()
            .any(|posting| posting.doc_id == doc_id)
    }

    /// Number of postings recorded for a token.
    pub fn doc_freq(&self, token: &str) -> usize {
        self.doc_freqs.get(token).copied().unwrap_or(0)
    }

    /// Metadata stored for a document.
    pub fn get_document(&self, doc_id: &str) -> Option<&Record> {
        self.documents.get(doc_id)
    }

    /// Whether a document id has been indexed.
    pub fn contains_document(&self, doc_id: &str) -> bool {
        self.documents.contains_key(doc_id)
    }

    /// Corpus statistics.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Number of indexed documents.
    pub fn total_docs(&self) -> usize {
        self.stats.total_docs
    }

    /// Number of distinct tokens.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Whether no document has been indexed.
    pub fn is_empty(&self) -> bool {
        self.stats.total_docs == 0
    }

    /// Produce a deterministic snapshot (tokens in sorted order).
    pub fn to_snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            index: self
                .postings
                .iter()
                .map(|(token, postings)| (token.clone(), postings.clone()))
                .collect(),
            doc_freqs: self
                .doc_freqs
                .iter()
                .map(|(token, df)| (token.clone(), *df))
                .collect(),
            documents: self
                .documents
                .iter()
                .map(|(id, metadata)| (id.clone(), metadata.clone()))
                .collect(),
            stats: self.stats.clone(),
        }
    }

    /// Restore an index from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot violates the index invariants
    /// (document frequencies that disagree with the postings, or postings for
    /// unknown documents).
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Result<Self> {
        for (token, postings) in &snapshot.index {
            let df = snapshot.doc_freqs.get(token).copied().unwrap_or(0);
            if df != postings.len() {
                return Err(ScoutError::storage(format!(
                    "Inconsistent snapshot: token '{token}' has {} postings but doc_freq {df}",
                    postings.len()
                )));
            }
            if let Some(posting) = postings
                .iter()
                .find(|posting| !snapshot.stats.doc_lengths.contains_key(&posting.doc_id))
            {
                return Err(ScoutError::storage(format!(
                    "Inconsistent snapshot: token '{token}' references unknown document '{}'",
                    posting.doc_id
                )));
            }
        }

        debug!(
            target: "scout::index",
            documents = snapshot.stats.total_docs,
            tokens = snapshot.index.len(),
            "Restored index from snapshot"
        );

        Ok(InvertedIndex {
            postings: snapshot.index.into_iter().collect(),
            doc_freqs: snapshot.doc_freqs.into_iter().collect(),
            documents: snapshot.documents.into_iter().collect(),
            stats: snapshot.stats,
        })
    }
}
