//! Build an index from raw records.
//!
//! The builder owns the document side of the analysis pipeline: select the
//! configured fields, tokenize them, repeat each field's tokens according to
//! its weight and drop stop words. The resulting sequence is what gets indexed
//! and what is kept as the document's raw token history, so phrase matching
//! and keyword matching always agree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::Tokenizer;
use crate::document::{Record, record_id};
use crate::error::{Result, ScoutError};
use crate::search::SearchConfig;
use crate::state::IndexState;

/// What to do with records that cannot be indexed during a bulk build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Log the record and continue.
    #[default]
    Skip,
    /// Abort the build with the record's error.
    Fail,
}

/// Turns records into token sequences and builds [`IndexState`]s.
///
/// # Examples
///
/// ```
/// use scout::index::IndexBuilder;
/// use scout::search::SearchConfig;
/// use serde_json::json;
///
/// let builder = IndexBuilder::new(SearchConfig::new()).unwrap();
/// let records = vec![
///     serde_json::from_value(json!({"id": 1, "text": "The quick fox"})).unwrap(),
///     serde_json::from_value(json!({"text": "no id"})).unwrap(),
/// ];
///
/// let state = builder.build(records).unwrap();
/// assert_eq!(state.index().total_docs(), 1);
/// assert_eq!(state.get_document_tokens("1"), ["quick", "fox"]);
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    tokenizer: Tokenizer,
    config: SearchConfig,
}

impl IndexBuilder {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid n-gram size or field
    /// weight.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(config.ngram)?;
        Ok(IndexBuilder { tokenizer, config })
    }

    /// The tokenizer shared with query processing.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Compute the indexed token sequence of a record.
    ///
    /// `fields` overrides the configured field list. Absent and `null` fields
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::InvalidRecord`] if a selected field holds a
    /// non-string value.
    pub fn document_tokens(&self, record: &Record, fields: Option<&[String]>) -> Result<Vec<String>> {
        let configured;
        let fields = match fields {
            Some(fields) => fields,
            None => {
                configured = self.config.effective_fields();
                configured.as_slice()
            }
        };

        let mut tokens = Vec::new();
        for field in fields {
            let text = match record.get(field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(text)) => text,
                Some(_) => {
                    return Err(ScoutError::invalid_record(format!(
                        "field '{field}' is not a string"
                    )));
                }
            };
            let field_tokens = self.tokenizer.tokenize(text);
            for _ in 0..self.config.repeat_count(field) {
                tokens.extend(field_tokens.iter().cloned());
            }
        }

        Ok(self.config.stopwords.filter(tokens))
    }

    /// Build an index state from records.
    ///
    /// Records without an id, with non-string field values or with an id that
    /// was already seen are handled according to the configured
    /// [`RecordPolicy`]. Records that produce no tokens are skipped.
    pub fn build<I>(&self, records: I) -> Result<IndexState>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut state = IndexState::new();
        let mut skipped = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            match self.index_record(&mut state, record) {
                Ok(true) => {}
                Ok(false) => skipped += 1,
                Err(e) => match self.config.record_policy {
                    RecordPolicy::Fail => return Err(e),
                    RecordPolicy::Skip => {
                        warn!(
                            target: "scout::index",
                            position,
                            error = %e,
                            "Skipping record"
                        );
                        skipped += 1;
                    }
                },
            }
        }

        info!(
            target: "scout::index",
            documents = state.index().total_docs(),
            tokens = state.index().vocabulary_size(),
            skipped,
            "Built index"
        );
        Ok(state)
    }

    /// Index one record. Returns `Ok(false)` if it produced no tokens.
    fn index_record(&self, state: &mut IndexState, record: Record) -> Result<bool> {
        let doc_id = record_id(&record)
            .ok_or_else(|| ScoutError::invalid_record("missing or non-scalar 'id'"))?;
        let tokens = self.document_tokens(&record, None)?;
        if tokens.is_empty() {
            debug!(target: "scout::index", doc_id = %doc_id, "Record has no tokens");
            return Ok(false);
        }
        state.add_document(doc_id, tokens, record)?;
        Ok(true)
    }
}
