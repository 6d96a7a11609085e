//! Search engine: index building, query evaluation and persistence.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::StopWords;
use crate::document::Record;
use crate::error::{Result, ScoutError};
use crate::index::{IndexBuilder, IndexSnapshot, InvertedIndex};
use crate::query::{ParsedQuery, QueryParser};
use crate::ranking::{RankingResult, RankingStrategy};
use crate::search::config::SearchConfig;
use crate::state::IndexState;
use crate::storage::Storage;

/// Number of hits returned when the caller has no preference.
pub const DEFAULT_LIMIT: usize = 10;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matching document.
    pub doc_id: String,
    /// Its score and breakdown.
    pub result: RankingResult,
}

impl SearchHit {
    /// Score of the hit.
    pub fn score(&self) -> f64 {
        self.result.score()
    }
}

/// Engine configuration as written next to the index snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// Stop words, sorted.
    pub stopwords: StopWords,
    /// Field weights.
    pub field_weights: BTreeMap<String, f64>,
    /// N-gram size.
    pub ngram: Option<usize>,
    /// Explicit field list, if one was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Everything `save` writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// The inverted index.
    pub index: IndexSnapshot,
    /// The analysis configuration needed to query the index.
    pub config: PersistedConfig,
    /// Raw token sequences; absent for engines without token history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_tokens: Option<BTreeMap<String, Vec<String>>>,
}

impl From<&SearchConfig> for PersistedConfig {
    fn from(config: &SearchConfig) -> Self {
        PersistedConfig {
            stopwords: config.stopwords.clone(),
            field_weights: config.field_weights.clone(),
            ngram: config.ngram,
            fields: config.fields.clone(),
        }
    }
}

impl EngineSnapshot {
    /// Capture an index, its configuration and optional token history.
    pub fn capture(
        index: &InvertedIndex,
        config: PersistedConfig,
        doc_tokens: Option<&HashMap<String, Vec<String>>>,
    ) -> Self {
        EngineSnapshot {
            index: index.to_snapshot(),
            config,
            doc_tokens: doc_tokens.map(|tokens| {
                tokens
                    .iter()
                    .map(|(id, tokens)| (id.clone(), tokens.clone()))
                    .collect()
            }),
        }
    }
}

/// Where the engine's documents live.
#[derive(Debug)]
enum Backing {
    /// Index with token history; supports phrase queries.
    State(IndexState),
    /// Index alone.
    Bare(InvertedIndex),
}

/// An in-memory search engine over a set of records.
///
/// Mutation takes `&mut self` and search takes `&self`, so the borrow checker
/// enforces the single-writer, no-concurrent-reader discipline.
///
/// # Examples
///
/// ```
/// use scout::ranking::Bm25Ranking;
/// use scout::search::{SearchConfig, SearchEngine};
/// use serde_json::json;
///
/// # fn main() -> scout::error::Result<()> {
/// let records = vec![
///     serde_json::from_value(json!({"id": 1, "text": "the quick brown fox"}))?,
///     serde_json::from_value(json!({"id": 2, "text": "the lazy dog"}))?,
/// ];
/// let engine = SearchEngine::from_records(
///     records,
///     Box::new(Bm25Ranking::default()),
///     SearchConfig::new(),
/// )?;
///
/// let hits = engine.search("\"quick brown\" -lazy", 10)?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].doc_id, "1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SearchEngine {
    builder: IndexBuilder,
    ranking: Box<dyn RankingStrategy>,
    parser: QueryParser,
    backing: Backing,
}

impl SearchEngine {
    /// Build an engine from records.
    ///
    /// Records are indexed together with their token history, so phrase
    /// queries are always available.
    ///
    /// # Errors
    ///
    /// Configuration errors, and record errors under
    /// [`RecordPolicy::Fail`](crate::index::RecordPolicy::Fail).
    pub fn from_records<I>(
        records: I,
        ranking: Box<dyn RankingStrategy>,
        config: SearchConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let builder = IndexBuilder::new(config)?;
        let state = builder.build(records)?;
        Ok(Self::assemble(builder, ranking, Backing::State(state)))
    }

    /// Create an engine around an existing state, e.g. one with subscribers
    /// already attached.
    pub fn with_state(
        state: IndexState,
        ranking: Box<dyn RankingStrategy>,
        config: SearchConfig,
    ) -> Result<Self> {
        let builder = IndexBuilder::new(config)?;
        Ok(Self::assemble(builder, ranking, Backing::State(state)))
    }

    /// Create an engine around a bare index. Phrase queries against it fail
    /// with [`ScoutError::MissingTokenHistory`].
    pub fn with_index(
        index: InvertedIndex,
        ranking: Box<dyn RankingStrategy>,
        config: SearchConfig,
    ) -> Result<Self> {
        let builder = IndexBuilder::new(config)?;
        Ok(Self::assemble(builder, ranking, Backing::Bare(index)))
    }

    fn assemble(builder: IndexBuilder, ranking: Box<dyn RankingStrategy>, backing: Backing) -> Self {
        SearchEngine {
            builder,
            ranking,
            parser: QueryParser::new(),
            backing,
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &InvertedIndex {
        match &self.backing {
            Backing::State(state) => state.index(),
            Backing::Bare(index) => index,
        }
    }

    /// The index state, if the engine keeps token history.
    pub fn state(&self) -> Option<&IndexState> {
        match &self.backing {
            Backing::State(state) => Some(state),
            Backing::Bare(_) => None,
        }
    }

    /// Mutable access to the state, e.g. to subscribe to changes.
    pub fn state_mut(&mut self) -> Option<&mut IndexState> {
        match &mut self.backing {
            Backing::State(state) => Some(state),
            Backing::Bare(_) => None,
        }
    }

    /// Whether phrase queries can be answered.
    pub fn has_token_history(&self) -> bool {
        matches!(self.backing, Backing::State(_))
    }

    /// The engine configuration.
    pub fn config(&self) -> &SearchConfig {
        self.builder.config()
    }

    /// The ranking strategy.
    pub fn ranking(&self) -> &dyn RankingStrategy {
        self.ranking.as_ref()
    }

    /// Replace the ranking strategy.
    pub fn set_ranking(&mut self, ranking: Box<dyn RankingStrategy>) {
        self.ranking = ranking;
    }

    /// Index one more record under `doc_id`.
    ///
    /// The record goes through the same field weighting and stop word
    /// filtering as a bulk build; `fields` overrides the configured field
    /// list for this record. The document is searchable as soon as this
    /// returns.
    ///
    /// # Errors
    ///
    /// Fails for non-string field values and already indexed ids. Subscriber
    /// failures are reported after the document has been indexed.
    pub fn add_document<S: Into<String>>(
        &mut self,
        doc_id: S,
        record: Record,
        fields: Option<&[String]>,
    ) -> Result<()> {
        let doc_id = doc_id.into();
        let tokens = self.builder.document_tokens(&record, fields)?;
        debug!(target: "scout::search", doc_id = %doc_id, tokens = tokens.len(), "Adding document");

        match &mut self.backing {
            Backing::State(state) => state.add_document(doc_id, tokens, record),
            Backing::Bare(index) => index.add_document(doc_id, &tokens, record),
        }
    }

    /// Parse a query and apply the engine's stop words to it.
    pub fn parse_query(&self, query: &str) -> ParsedQuery {
        let mut parsed = self.parser.parse(query);
        parsed.remove_stopwords(&self.config().stopwords);
        parsed
    }

    /// Run a query and return at most `limit` hits, best first.
    ///
    /// Hits are ordered by descending score, ties broken by ascending
    /// document id. Documents scoring exactly 0 are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::MissingTokenHistory`] for phrase queries against
    /// an engine without token history. An empty result is not an error.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let mut parsed = self.parser.parse(query);
        let stopwords = &self.config().stopwords;

        // Phrase words stand in only when the raw query has no terms at all;
        // stop words are removed after that choice.
        let mut query_tokens = parsed.terms();
        if query_tokens.is_empty() {
            query_tokens = parsed.phrase_words();
        }
        query_tokens.retain(|t| !stopwords.contains(t));
        if query_tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        parsed.remove_stopwords(stopwords);

        let doc_tokens = match (&self.backing, parsed.phrases.is_empty()) {
            (_, true) => None,
            (Backing::State(state), false) => Some(state),
            (Backing::Bare(_), false) => return Err(ScoutError::MissingTokenHistory),
        };

        let index = self.index();
        let query_tokens: Vec<String> = query_tokens.into_iter().collect();
        let candidates = Self::candidate_documents(index, &query_tokens);
        let terms = parsed.terms();

        let mut hits = Vec::new();
        for doc_id in &candidates {
            if parsed
                .excluded
                .iter()
                .any(|t| index.document_contains(doc_id, t))
            {
                continue;
            }

            let keep = if parsed.has_or {
                terms.iter().any(|t| index.document_contains(doc_id, t))
            } else {
                parsed
                    .required
                    .iter()
                    .all(|t| index.document_contains(doc_id, t))
            };
            if !keep {
                continue;
            }

            if let Some(state) = doc_tokens {
                let tokens = state.get_document_tokens(doc_id);
                if !parsed.phrases.iter().all(|p| contains_phrase(tokens, p)) {
                    continue;
                }
            }

            let result = self.ranking.score(&query_tokens, index, doc_id);
            if result.score() != 0.0 {
                hits.push(SearchHit {
                    doc_id: doc_id.to_string(),
                    result,
                });
            }
        }

        hits.sort_by(|a, b| {
            b.score()
                .total_cmp(&a.score())
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(limit);

        debug!(
            target: "scout::search",
            query,
            candidates = candidates.len(),
            hits = hits.len(),
            "Search complete"
        );
        Ok(hits)
    }

    /// Union of the documents in the postings of every query token.
    fn candidate_documents<'a>(index: &'a InvertedIndex, query_tokens: &[String]) -> BTreeSet<&'a str> {
        query_tokens
            .iter()
            .flat_map(|token| index.get_postings(token))
            .map(|posting| posting.doc_id.as_str())
            .collect()
    }

    /// Deterministic image of the engine: index, analysis configuration and,
    /// when available, token history. Ranking is not included.
    pub fn to_snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(
            self.index(),
            PersistedConfig::from(self.config()),
            self.state().map(IndexState::doc_tokens),
        )
    }

    /// Rebuild an engine from a snapshot.
    pub fn from_snapshot(snapshot: EngineSnapshot, ranking: Box<dyn RankingStrategy>) -> Result<Self> {
        let index = InvertedIndex::from_snapshot(snapshot.index)?;
        let mut config = SearchConfig::new()
            .stopwords(snapshot.config.stopwords)
            .field_weights(snapshot.config.field_weights)
            .ngram(snapshot.config.ngram);
        config.fields = snapshot.config.fields;

        match snapshot.doc_tokens {
            Some(doc_tokens) => {
                if let Some(id) = doc_tokens.keys().find(|id| !index.contains_document(id)) {
                    return Err(ScoutError::storage(format!(
                        "Inconsistent snapshot: token history for unknown document '{id}'"
                    )));
                }
                let state = IndexState::from_parts(index, doc_tokens.into_iter().collect());
                Self::with_state(state, ranking, config)
            }
            None => Self::with_index(index, ranking, config),
        }
    }

    /// Persist the engine under `key`.
    pub fn save(&self, storage: &dyn Storage, key: &str) -> Result<()> {
        let bytes = serde_json::to_vec(&self.to_snapshot())?;
        storage.save(key, &bytes)?;
        info!(
            target: "scout::search",
            key,
            documents = self.index().total_docs(),
            bytes = bytes.len(),
            "Saved engine"
        );
        Ok(())
    }

    /// Load an engine saved with [`SearchEngine::save`].
    ///
    /// Ranking configuration is not persisted, so the caller supplies it.
    pub fn load(storage: &dyn Storage, key: &str, ranking: Box<dyn RankingStrategy>) -> Result<Self> {
        let bytes = storage.load(key)?;
        let snapshot: EngineSnapshot = serde_json::from_slice(&bytes)?;
        let engine = Self::from_snapshot(snapshot, ranking)?;
        info!(
            target: "scout::search",
            key,
            documents = engine.index().total_docs(),
            token_history = engine.has_token_history(),
            "Loaded engine"
        );
        Ok(engine)
    }
}

/// Whether `phrase` occurs as a contiguous run of `tokens`.
fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|window| window == phrase)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::ranking::{Bm25Ranking, RobustRanking, TermFrequencyRanking};
    use crate::storage::MemoryStorage;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    fn corpus() -> Vec<Record> {
        records(vec![
            json!({"id": "1", "text": "the quick brown fox"}),
            json!({"id": "2", "text": "quick fox brown"}),
            json!({"id": "3", "text": "the lazy dog sleeps"}),
            json!({"id": "4", "text": "a lazy fox"}),
        ])
    }

    fn engine() -> SearchEngine {
        SearchEngine::from_records(corpus(), Box::new(TermFrequencyRanking), SearchConfig::new()).unwrap()
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|hit| hit.doc_id.as_str()).collect()
    }

    #[test]
    fn test_required_terms() {
        let hits = engine().search("quick fox", 10).unwrap();
        assert_eq!(ids(&hits), vec!["1", "2"]);
    }

    #[test]
    fn test_exclusion() {
        let hits = engine().search("fox -lazy", 10).unwrap();
        assert_eq!(ids(&hits), vec!["1", "2"]);
    }

    #[test]
    fn test_or_is_query_wide() {
        // With OR anywhere, any term suffices.
        let hits = engine().search("dog OR brown", 10).unwrap();
        assert_eq!(ids(&hits), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_or_without_terms_matches_nothing() {
        let hits = engine().search("OR \"quick fox\"", 10).unwrap();
        assert!(hits.is_empty());
        assert!(engine().search("OR -lazy \"lazy fox\"", 10).unwrap().is_empty());
    }

    #[test]
    fn test_stopword_term_blocks_phrase_fallback() {
        let engine = engine();
        // "the" is the only term, so the phrase words are not used as
        // candidates; once "the" is dropped nothing is left to search for.
        assert!(engine.search("the \"quick fox\"", 10).unwrap().is_empty());
        assert_eq!(ids(&engine.search("\"quick fox\"", 10).unwrap()), vec!["2"]);
        // Stop words inside the phrase itself are still filtered.
        assert_eq!(ids(&engine.search("\"the quick brown\"", 10).unwrap()), vec!["1"]);
    }

    #[test]
    fn test_malformed_queries_do_not_fail() {
        let engine = engine();
        for query in ["\"", "-", "OR OR", "\"\"", "- \" OR", "fox \"quick", "\"fox\" \""] {
            assert!(engine.search(query, 10).is_ok(), "{query:?}");
        }
        // An unterminated phrase runs to the end of the query.
        assert_eq!(ids(&engine.search("\"quick brown", 10).unwrap()), vec!["1"]);
    }

    #[test]
    fn test_phrase() {
        let hits = engine().search("\"quick brown fox\"", 10).unwrap();
        assert_eq!(ids(&hits), vec!["1"]);
    }

    #[test]
    fn test_phrase_with_terms() {
        let hits = engine().search("fox \"lazy fox\"", 10).unwrap();
        assert_eq!(ids(&hits), vec!["4"]);
    }

    #[test]
    fn test_ordering_and_limit() {
        let engine = SearchEngine::from_records(
            records(vec![
                json!({"id": "b", "text": "fox"}),
                json!({"id": "a", "text": "fox"}),
                json!({"id": "c", "text": "fox fox"}),
            ]),
            Box::new(TermFrequencyRanking),
            SearchConfig::new(),
        )
        .unwrap();

        assert_eq!(ids(&engine.search("fox", 10).unwrap()), vec!["c", "a", "b"]);
        assert_eq!(ids(&engine.search("fox", 2).unwrap()), vec!["c", "a"]);
        assert!(engine.search("fox", 0).unwrap().is_empty());
    }

    #[test]
    fn test_stopword_only_query() {
        let engine = engine();
        assert!(engine.search("the", 10).unwrap().is_empty());
        assert!(engine.search("\"the a\"", 10).unwrap().is_empty());
        assert!(engine.search("", 10).unwrap().is_empty());
    }

    #[test]
    fn test_add_document_is_searchable() {
        let mut engine = engine();
        let record: Record = serde_json::from_value(json!({"id": "5", "text": "purple quick zebra"})).unwrap();
        engine.add_document("5", record, None).unwrap();

        assert_eq!(ids(&engine.search("zebra", 10).unwrap()), vec!["5"]);
        assert_eq!(ids(&engine.search("\"purple quick\"", 10).unwrap()), vec!["5"]);
    }

    #[test]
    fn test_add_document_with_fields() {
        let mut engine = engine();
        let record: Record =
            serde_json::from_value(json!({"id": "5", "title": "owl", "text": "ignored"})).unwrap();
        let fields = vec!["title".to_string()];
        engine.add_document("5", record, Some(&fields)).unwrap();

        assert_eq!(ids(&engine.search("owl", 10).unwrap()), vec!["5"]);
        assert!(engine.search("ignored", 10).unwrap().is_empty());
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut engine = engine();
        let record: Record = serde_json::from_value(json!({"text": "again"})).unwrap();
        assert!(matches!(
            engine.add_document("1", record, None),
            Err(ScoutError::DuplicateDocument(_))
        ));
    }

    #[test]
    fn test_bare_index_rejects_phrases() {
        let source = engine();
        let engine = SearchEngine::with_index(
            source.index().clone(),
            Box::new(TermFrequencyRanking),
            SearchConfig::new(),
        )
        .unwrap();

        assert!(!engine.has_token_history());
        assert_eq!(ids(&engine.search("fox -lazy", 10).unwrap()), vec!["1", "2"]);
        assert!(matches!(
            engine.search("\"quick fox\"", 10),
            Err(ScoutError::MissingTokenHistory)
        ));
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let engine = SearchEngine::from_records(corpus(), Box::new(Bm25Ranking::default()), SearchConfig::new())
            .unwrap();
        engine.save(&storage, "engine.json").unwrap();

        let loaded = SearchEngine::load(&storage, "engine.json", Box::new(Bm25Ranking::default())).unwrap();
        assert!(loaded.has_token_history());
        for query in ["fox", "quick OR dog", "fox -lazy", "\"quick brown\""] {
            assert_eq!(
                loaded.search(query, 10).unwrap(),
                engine.search(query, 10).unwrap(),
                "{query}"
            );
        }
    }

    #[test]
    fn test_snapshot_shape() {
        let engine = engine();
        let json = serde_json::to_value(engine.to_snapshot()).unwrap();
        assert_eq!(json["config"]["stopwords"], json!(["a", "an", "and", "or", "the"]));
        assert_eq!(json["config"]["ngram"], Value::Null);
        assert_eq!(json["index"]["stats"]["total_docs"], 4);
        assert_eq!(json["doc_tokens"]["1"], json!(["quick", "brown", "fox"]));
    }

    #[test]
    fn test_snapshot_without_history_loads_bare() {
        let mut snapshot = engine().to_snapshot();
        snapshot.doc_tokens = None;
        let loaded = SearchEngine::from_snapshot(snapshot, Box::new(RobustRanking::default())).unwrap();
        assert!(!loaded.has_token_history());
    }

    #[test]
    fn test_snapshot_rejects_unknown_history() {
        let mut snapshot = engine().to_snapshot();
        if let Some(tokens) = snapshot.doc_tokens.as_mut() {
            tokens.insert("99".to_string(), vec!["ghost".to_string()]);
        }
        assert!(matches!(
            SearchEngine::from_snapshot(snapshot, Box::new(RobustRanking::default())),
            Err(ScoutError::Storage(_))
        ));
    }

    #[test]
    fn test_contains_phrase() {
        let tokens: Vec<String> = ["a", "b", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let phrase = |words: &[&str]| words.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(contains_phrase(&tokens, &phrase(&["a", "b", "c"])));
        assert!(!contains_phrase(&tokens, &phrase(&["c", "a"])));
        assert!(!contains_phrase(&tokens, &phrase(&[])));
        assert!(!contains_phrase(&tokens[..1], &phrase(&["a", "b"])));
    }
}
