//! Text analysis: tokenization and stop word filtering.
//!
//! Documents and queries go through the same pipeline: the [`Tokenizer`]
//! lowercases text and extracts Unicode word runs (optionally expanded into
//! n-grams), then [`StopWords`] drops configured noise words.
//!
//! # Examples
//!
//! ```
//! use scout::analysis::{StopWords, Tokenizer};
//!
//! let tokenizer = Tokenizer::new(None).unwrap();
//! let stopwords = StopWords::default();
//!
//! let tokens = stopwords.filter(tokenizer.tokenize("The quick, brown fox!"));
//! assert_eq!(tokens, vec!["quick", "brown", "fox"]);
//! ```

pub mod stop;
pub mod tokenizer;

pub use stop::{DEFAULT_STOP_WORDS, StopWords};
pub use tokenizer::Tokenizer;
