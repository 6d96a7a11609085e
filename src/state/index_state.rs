//! Index plus raw token history.

use std::collections::HashMap;

use crate::document::Record;
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::state::signal::{IndexChange, Signal, SubscriptionId};

/// Mutable container of an index, the per-document token sequences and the
/// change subscribers.
///
/// # Examples
///
/// ```
/// use scout::state::IndexState;
///
/// let mut state = IndexState::new();
/// let tokens = vec!["quick".to_string(), "fox".to_string()];
/// state.add_document("1", tokens.clone(), Default::default()).unwrap();
///
/// assert_eq!(state.get_document_tokens("1"), tokens.as_slice());
/// assert!(state.get_document_tokens("2").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct IndexState {
    index: InvertedIndex,
    doc_tokens: HashMap<String, Vec<String>>,
    on_change: Signal,
}

impl IndexState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing index and token history.
    pub fn from_parts(index: InvertedIndex, doc_tokens: HashMap<String, Vec<String>>) -> Self {
        IndexState {
            index,
            doc_tokens,
            on_change: Signal::new(),
        }
    }

    /// The wrapped index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Add a document, record its tokens and notify subscribers.
    ///
    /// # Errors
    ///
    /// Fails without side effects if the index rejects the document. If a
    /// subscriber fails, the document stays indexed, the remaining
    /// subscribers still run and the first subscriber error is returned.
    pub fn add_document<S: Into<String>>(
        &mut self,
        doc_id: S,
        tokens: Vec<String>,
        metadata: Record,
    ) -> Result<()> {
        let doc_id = doc_id.into();
        self.index.add_document(doc_id.clone(), &tokens, metadata)?;
        self.doc_tokens.insert(doc_id.clone(), tokens);

        let change = IndexChange {
            doc_id: &doc_id,
            index: &self.index,
            doc_tokens: &self.doc_tokens,
        };
        self.on_change.emit(&change)
    }

    /// Raw token sequence of a document, empty if the id is unknown.
    pub fn get_document_tokens(&self, doc_id: &str) -> &[String] {
        self.doc_tokens.get(doc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All token sequences, keyed by document id.
    pub fn doc_tokens(&self) -> &HashMap<String, Vec<String>> {
        &self.doc_tokens
    }

    /// Register a change subscriber.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&IndexChange<'_>) -> Result<()> + Send + 'static,
    {
        self.on_change.subscribe(callback)
    }

    /// Remove a change subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_change.unsubscribe(id)
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.on_change.len()
    }
}
