//! Unicode word tokenizer with optional word n-gram expansion.
//!
//! The tokenizer is a pure function of its input and the configured n-gram
//! size: tokenizing the same text twice always yields the same sequence.
//!
//! # Examples
//!
//! ```
//! use scout::analysis::Tokenizer;
//!
//! let tokenizer = Tokenizer::new(None).unwrap();
//! assert_eq!(tokenizer.tokenize("Hello, World!"), vec!["hello", "world"]);
//!
//! let bigrams = Tokenizer::new(Some(2)).unwrap();
//! assert_eq!(bigrams.tokenize("quick brown fox"), vec!["quick_brown", "brown_fox"]);
//! ```

use regex::Regex;
use serde_json::Value;

use crate::document::Record;
use crate::error::{Result, ScoutError};

/// Maximal runs of Unicode word characters.
const WORD_RUN_PATTERN: &str = r"\w+";

/// Separator used to join consecutive unigrams into one n-gram token.
pub const NGRAM_SEPARATOR: &str = "_";

/// Deterministic tokenizer used for both indexing and querying.
///
/// - Lowercases text
/// - Extracts maximal runs of Unicode word characters, every other character
///   acts as a separator
/// - With an n-gram size `N > 1`, replaces the unigrams with sliding windows of
///   `N` consecutive unigrams joined by `_`
#[derive(Clone, Debug)]
pub struct Tokenizer {
    /// Compiled word-run pattern.
    word_run: Regex,
    /// N-gram window size; `None` and `Some(1)` both mean plain unigrams.
    ngram: Option<usize>,
}

impl Tokenizer {
    /// Create a new tokenizer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `ngram` is `Some(0)`.
    pub fn new(ngram: Option<usize>) -> Result<Self> {
        if ngram == Some(0) {
            return Err(ScoutError::config("ngram must be >= 1"));
        }
        let word_run = Regex::new(WORD_RUN_PATTERN)
            .map_err(|e| ScoutError::config(format!("Invalid word pattern: {e}")))?;
        Ok(Tokenizer { word_run, ngram })
    }

    /// The configured n-gram size.
    pub fn ngram(&self) -> Option<usize> {
        self.ngram
    }

    /// Tokenize a piece of text.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let unigrams: Vec<String> = self
            .word_run
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect();

        match self.ngram {
            Some(n) if n > 1 => Self::ngrams(&unigrams, n),
            _ => unigrams,
        }
    }

    /// Tokenize the string-valued fields of a record.
    ///
    /// With an explicit field list, only those fields are used (in the given
    /// order); otherwise every string-valued field is used in iteration order.
    /// Non-string values are ignored. The selected values are joined with a
    /// single space before tokenizing.
    pub fn tokenize_record(&self, record: &Record, fields: Option<&[String]>) -> Vec<String> {
        let texts: Vec<&str> = match fields {
            Some(fields) => fields
                .iter()
                .filter_map(|field| record.get(field).and_then(Value::as_str))
                .collect(),
            None => record.values().filter_map(Value::as_str).collect(),
        };

        self.tokenize(&texts.join(" "))
    }

    fn ngrams(unigrams: &[String], n: usize) -> Vec<String> {
        unigrams
            .windows(n)
            .map(|window| window.join(NGRAM_SEPARATOR))
            .collect()
    }
}
