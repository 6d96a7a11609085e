//! Stop word filtering.
//!
//! Stop words are removed from document token sequences before indexing and
//! from query terms before candidate generation, so both sides of a match see
//! the same vocabulary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default stop words used when none are configured.
pub const DEFAULT_STOP_WORDS: &[&str] = &["the", "a", "an", "and", "or"];

/// An ordered set of stop words.
///
/// # Examples
///
/// ```
/// use scout::analysis::StopWords;
///
/// let stopwords = StopWords::from_words(["the", "of"]);
/// assert!(stopwords.contains("the"));
/// assert_eq!(
///     stopwords.filter(vec!["the".into(), "king".into(), "of".into(), "spain".into()]),
///     vec!["king", "spain"]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOP_WORDS.iter().copied())
    }
}

impl StopWords {
    /// Create an empty stop word set (filters nothing).
    pub fn none() -> Self {
        StopWords {
            words: BTreeSet::new(),
        }
    }

    /// Create a stop word set from a list of words. Words are lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords {
            words: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    /// Check whether a token is a stop word.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Remove stop words from a token sequence, preserving order.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        if self.words.is_empty() {
            return tokens;
        }
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }

    /// Iterate over the stop words in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stop_words() {
        let stopwords = StopWords::default();
        assert_eq!(stopwords.len(), 5);
        for word in DEFAULT_STOP_WORDS {
            assert!(stopwords.contains(word));
        }
        assert!(!stopwords.contains("fox"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let stopwords = StopWords::from_words(["The"]);
        let tokens = vec!["the".to_string(), "fox".into(), "the".into(), "dog".into()];
        assert_eq!(stopwords.filter(tokens), vec!["fox", "dog"]);
    }

    #[test]
    fn test_none_filters_nothing() {
        let stopwords = StopWords::none();
        let tokens = vec!["the".to_string(), "fox".into()];
        assert_eq!(stopwords.filter(tokens.clone()), tokens);
    }

    #[test]
    fn test_serializes_as_sorted_list() {
        let stopwords = StopWords::from_words(["or", "and", "the"]);
        let json = serde_json::to_string(&stopwords).unwrap();
        assert_eq!(json, r#"["and","or","the"]"#);
    }
}
