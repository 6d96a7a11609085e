//! Persistence subscriber.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, ScoutError};
use crate::index::InvertedIndex;
use crate::search::{EngineSnapshot, PersistedConfig, SearchConfig};
use crate::state::index_state::IndexState;
use crate::state::signal::SubscriptionId;
use crate::storage::Storage;

/// Writes an engine snapshot to storage when the index changes.
///
/// The payload is the one [`SearchEngine::save`](crate::search::SearchEngine::save)
/// writes: index, analysis configuration and token history. So
/// [`SearchEngine::load`](crate::search::SearchEngine::load) restores an
/// engine that still answers phrase queries.
///
/// Every save serializes the whole index, so the cost of a write is
/// proportional to the index size, not to the size of the change. With the
/// default `save_every(1)` a bulk load therefore does O(n²) work; raise the
/// interval for write-heavy workloads and call [`AutoSaver::save`] at the end.
#[derive(Debug, Clone)]
pub struct AutoSaver {
    storage: Arc<dyn Storage>,
    key: String,
    config: PersistedConfig,
    save_every: usize,
}

impl AutoSaver {
    /// Save under `key` after every change. `config` must be the one the
    /// watched state was built with.
    pub fn new<S: Into<String>>(storage: Arc<dyn Storage>, key: S, config: &SearchConfig) -> Self {
        AutoSaver {
            storage,
            key: key.into(),
            config: PersistedConfig::from(config),
            save_every: 1,
        }
    }

    /// Only save after every `n`-th change.
    pub fn save_every(mut self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ScoutError::config("save_every must be >= 1"));
        }
        self.save_every = n;
        Ok(self)
    }

    /// The storage key snapshots are written to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write a snapshot of `state` now.
    pub fn save(&self, state: &IndexState) -> Result<()> {
        self.write(state.index(), state.doc_tokens())
    }

    fn write(&self, index: &InvertedIndex, doc_tokens: &HashMap<String, Vec<String>>) -> Result<()> {
        let snapshot = EngineSnapshot::capture(index, self.config.clone(), Some(doc_tokens));
        let bytes = serde_json::to_vec(&snapshot)?;
        self.storage.save(&self.key, &bytes)?;
        tracing::debug!(
            target: "scout::state",
            key = %self.key,
            documents = index.total_docs(),
            bytes = bytes.len(),
            "Saved engine snapshot"
        );
        Ok(())
    }

    /// Subscribe to `state`.
    pub fn attach(self, state: &mut IndexState) -> SubscriptionId {
        let mut pending = 0usize;
        state.subscribe(move |change| {
            pending += 1;
            if pending < self.save_every {
                return Ok(());
            }
            pending = 0;
            self.write(change.index, change.doc_tokens)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Record;
    use crate::ranking::TermFrequencyRanking;
    use crate::search::SearchEngine;
    use crate::storage::MemoryStorage;

    fn add(state: &mut IndexState, id: &str, words: &[&str]) -> Result<()> {
        let tokens = words.iter().map(|w| w.to_string()).collect();
        state.add_document(id, tokens, Record::new())
    }

    fn load(storage: &MemoryStorage) -> SearchEngine {
        SearchEngine::load(storage, "index.json", Box::new(TermFrequencyRanking)).unwrap()
    }

    #[test]
    fn test_saves_on_every_change() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = IndexState::new();
        AutoSaver::new(storage.clone(), "index.json", &SearchConfig::new()).attach(&mut state);

        add(&mut state, "1", &["fox"]).unwrap();
        add(&mut state, "2", &["lazy", "dog"]).unwrap();

        assert_eq!(storage.write_count(), 2);
        let engine = load(&storage);
        assert_eq!(engine.index().total_docs(), 2);
        assert!(engine.has_token_history());
        assert_eq!(engine.search("\"lazy dog\"", 10).unwrap()[0].doc_id, "2");
    }

    #[test]
    fn test_snapshot_keeps_config() {
        let storage = Arc::new(MemoryStorage::new());
        let config = SearchConfig::new().field_weight("title", 2.0).ngram(Some(2));
        let mut state = IndexState::new();
        AutoSaver::new(storage.clone(), "index.json", &config).attach(&mut state);

        add(&mut state, "1", &["quick_fox"]).unwrap();

        let engine = load(&storage);
        assert_eq!(engine.config().ngram, Some(2));
        assert_eq!(engine.config().field_weights, config.field_weights);
    }

    #[test]
    fn test_manual_save() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = IndexState::new();
        add(&mut state, "1", &["fox"]).unwrap();

        let saver = AutoSaver::new(storage.clone(), "index.json", &SearchConfig::new());
        saver.save(&state).unwrap();
        assert_eq!(load(&storage).index().total_docs(), 1);
    }

    #[test]
    fn test_save_every() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = IndexState::new();
        AutoSaver::new(storage.clone(), "index.json", &SearchConfig::new())
            .save_every(2)
            .unwrap()
            .attach(&mut state);

        add(&mut state, "1", &["a"]).unwrap();
        assert_eq!(storage.write_count(), 0);
        add(&mut state, "2", &["b"]).unwrap();
        assert_eq!(storage.write_count(), 1);
        add(&mut state, "3", &["c"]).unwrap();
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_save_every_zero_is_rejected() {
        let storage = Arc::new(MemoryStorage::new());
        assert!(matches!(
            AutoSaver::new(storage, "k", &SearchConfig::new()).save_every(0),
            Err(ScoutError::Config(_))
        ));
    }
}
