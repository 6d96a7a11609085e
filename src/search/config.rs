//! Configuration for index building and search.
//!
//! # Examples
//!
//! ```
//! use scout::analysis::StopWords;
//! use scout::search::SearchConfig;
//!
//! let config = SearchConfig::new()
//!     .field_weight("title", 2.0)
//!     .field_weight("body", 1.0)
//!     .stopwords(StopWords::from_words(["the"]));
//!
//! // Without an explicit field list the weighted fields are used.
//! assert_eq!(config.effective_fields(), vec!["body", "title"]);
//! assert_eq!(config.repeat_count("title"), 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::StopWords;
use crate::error::{Result, ScoutError};
use crate::index::RecordPolicy;

/// Field used when neither a field list nor field weights are configured.
pub const DEFAULT_FIELD: &str = "text";

/// Largest accepted field weight. Weights repeat tokens, so this also bounds
/// how much a single field can grow a document.
pub const MAX_FIELD_WEIGHT: f64 = 1000.0;

/// Configuration shared by the index builder and the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fields to index. `None` means the weighted fields, or `text`.
    pub fields: Option<Vec<String>>,
    /// Word n-gram size; `None` for plain unigrams.
    pub ngram: Option<usize>,
    /// Per-field weights; a field's tokens are repeated
    /// `max(1, round(weight))` times. Kept sorted by field name, so the
    /// weighted fields are concatenated in name order whatever order they
    /// were set in.
    pub field_weights: BTreeMap<String, f64>,
    /// Stop words removed from documents and queries.
    pub stopwords: StopWords,
    /// What to do with records that cannot be indexed.
    pub record_policy: RecordPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fields: None,
            ngram: None,
            field_weights: BTreeMap::new(),
            stopwords: StopWords::default(),
            record_policy: RecordPolicy::Skip,
        }
    }
}

impl SearchConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fields to index.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Set the n-gram size.
    pub fn ngram(mut self, ngram: Option<usize>) -> Self {
        self.ngram = ngram;
        self
    }

    /// Replace all field weights.
    pub fn field_weights(mut self, field_weights: BTreeMap<String, f64>) -> Self {
        self.field_weights = field_weights;
        self
    }

    /// Set the weight of one field.
    pub fn field_weight<S: Into<String>>(mut self, field: S, weight: f64) -> Self {
        self.field_weights.insert(field.into(), weight);
        self
    }

    /// Set the stop words.
    pub fn stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Set the malformed-record policy.
    pub fn record_policy(mut self, record_policy: RecordPolicy) -> Self {
        self.record_policy = record_policy;
        self
    }

    /// The fields actually indexed, in concatenation order.
    ///
    /// An explicit field list keeps its order. Otherwise the weighted fields
    /// are used sorted by name, which fixes where one field's tokens meet the
    /// next and so which phrases can span a field boundary.
    pub fn effective_fields(&self) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields.clone(),
            None if !self.field_weights.is_empty() => self.field_weights.keys().cloned().collect(),
            None => vec![DEFAULT_FIELD.to_string()],
        }
    }

    /// How many times the tokens of `field` are repeated, at most
    /// [`MAX_FIELD_WEIGHT`].
    pub fn repeat_count(&self, field: &str) -> usize {
        let weight = self.field_weights.get(field).copied().unwrap_or(1.0);
        if weight.is_finite() && weight >= 1.5 {
            weight.min(MAX_FIELD_WEIGHT).round() as usize
        } else {
            1
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a field weight above
    /// [`MAX_FIELD_WEIGHT`] (including infinity).
    pub fn validate(&self) -> Result<()> {
        match self
            .field_weights
            .iter()
            .find(|(_, weight)| **weight > MAX_FIELD_WEIGHT)
        {
            Some((field, weight)) => Err(ScoutError::config(format!(
                "weight of field '{field}' must be <= {MAX_FIELD_WEIGHT}, got {weight}"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields() {
        let config = SearchConfig::new();
        assert_eq!(config.effective_fields(), vec!["text"]);
        assert_eq!(config.repeat_count("text"), 1);
        assert_eq!(config.record_policy, RecordPolicy::Skip);
        assert!(config.stopwords.contains("the"));
    }

    #[test]
    fn test_explicit_fields_win_over_weights() {
        let config = SearchConfig::new()
            .field_weight("title", 3.0)
            .fields(["body"]);
        assert_eq!(config.effective_fields(), vec!["body"]);
    }

    #[test]
    fn test_repeat_count_rounding() {
        let config = SearchConfig::new()
            .field_weight("a", 0.2)
            .field_weight("b", 1.4)
            .field_weight("c", 2.5)
            .field_weight("d", 2.6)
            .field_weight("e", f64::NAN);
        assert_eq!(config.repeat_count("a"), 1);
        assert_eq!(config.repeat_count("b"), 1);
        assert_eq!(config.repeat_count("c"), 3);
        assert_eq!(config.repeat_count("d"), 3);
        assert_eq!(config.repeat_count("e"), 1);
        assert_eq!(config.repeat_count("missing"), 1);
    }

    #[test]
    fn test_huge_weights() {
        let config = SearchConfig::new().field_weight("title", 1e30);
        assert_eq!(config.repeat_count("title"), 1000);
        assert!(matches!(config.validate(), Err(ScoutError::Config(_))));

        let config = SearchConfig::new().field_weight("title", f64::INFINITY);
        assert!(config.validate().is_err());

        let config = SearchConfig::new()
            .field_weight("title", MAX_FIELD_WEIGHT)
            .field_weight("body", f64::NAN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SearchConfig::new()
            .ngram(Some(2))
            .field_weight("title", 2.0)
            .record_policy(RecordPolicy::Fail);
        let json = serde_json::to_string(&config).unwrap();
        let restored: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
