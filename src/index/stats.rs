//! Corpus-level statistics needed for ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document lengths and document counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Token count of every indexed document.
    pub doc_lengths: BTreeMap<String, usize>,

    /// Number of `add_document` calls recorded.
    pub total_docs: usize,
}

impl IndexStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new document of the given length.
    pub fn add_document(&mut self, doc_id: &str, length: usize) {
        self.doc_lengths.insert(doc_id.to_string(), length);
        self.total_docs += 1;
    }

    /// Length of a document, if it is known.
    pub fn doc_length(&self, doc_id: &str) -> Option<usize> {
        self.doc_lengths.get(doc_id).copied()
    }

    /// Average document length.
    ///
    /// Defaults to 1.0 when the index is empty or every document is empty so
    /// that length normalization never divides by zero.
    pub fn avg_doc_length(&self) -> f64 {
        let total: usize = self.doc_lengths.values().sum();
        if self.total_docs == 0 || total == 0 {
            return 1.0;
        }
        total as f64 / self.total_docs as f64
    }
}
