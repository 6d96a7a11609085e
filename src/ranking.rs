//! Ranking strategies.
//!
//! A [`RankingStrategy`] scores one candidate document against the query
//! tokens and returns a [`RankingResult`] carrying the total score plus a
//! breakdown that explains it.
//!
//! # Strategies
//!
//! - [`TermFrequencyRanking`] - raw term frequency
//! - [`TfIdfRanking`] - smoothed TF-IDF
//! - [`Bm25Ranking`] - Okapi BM25
//! - [`RobustRanking`] - fixed blend of TF and TF-IDF
//! - [`FusionRanking`] / [`CompositeRanking`] - weighted linear combination of
//!   other strategies, the latter with an optional recency booster
//! - [`RecencyRanking`] - exponential decay on a document's `timestamp`
//!
//! Strategies never fail while scoring: tokens without postings simply
//! contribute nothing. Invalid parameters are rejected at construction.

pub mod bm25;
pub mod fusion;
pub mod recency;
pub mod robust;
pub mod tf;
pub mod tfidf;

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::index::InvertedIndex;

pub use bm25::Bm25Ranking;
pub use fusion::{CompositeRanking, FusionRanking};
pub use recency::RecencyRanking;
pub use robust::RobustRanking;
pub use tf::TermFrequencyRanking;
pub use tfidf::TfIdfRanking;

/// Named numeric breakdown of a score.
pub type Components = BTreeMap<String, f64>;

/// Per-token breakdown of a score.
pub type PerTerm = BTreeMap<String, Components>;

/// The score of one document and how it was obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    score: f64,
    components: Components,
    per_term: PerTerm,
}

impl RankingResult {
    /// Create a result without per-term breakdown.
    pub fn new(score: f64, components: Components) -> Self {
        RankingResult {
            score,
            components,
            per_term: PerTerm::new(),
        }
    }

    /// Attach a per-term breakdown.
    pub fn with_per_term(mut self, per_term: PerTerm) -> Self {
        self.per_term = per_term;
        self
    }

    /// Total score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Named components of the score.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Per-token breakdown.
    pub fn per_term(&self) -> &PerTerm {
        &self.per_term
    }

    /// Split into score, components and per-term breakdown.
    pub fn into_parts(self) -> (f64, Components, PerTerm) {
        (self.score, self.components, self.per_term)
    }
}

/// Trait for document scoring strategies.
pub trait RankingStrategy: Send + Sync + Debug {
    /// Score `doc_id` for the given query tokens.
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult;

    /// Short identifier, used as the component key inside fusions.
    fn name(&self) -> &'static str;
}

impl<T: RankingStrategy + ?Sized> RankingStrategy for Box<T> {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        (**self).score(query_tokens, index, doc_id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::document::Record;
    use crate::index::InvertedIndex;

    /// Small index used by the ranking tests.
    ///
    /// - "1": fox fox dog (len 3)
    /// - "2": fox cat (len 2)
    /// - "3": bird (len 1)
    pub fn sample_index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for (id, words) in [
            ("1", vec!["fox", "fox", "dog"]),
            ("2", vec!["fox", "cat"]),
            ("3", vec!["bird"]),
        ] {
            let tokens: Vec<String> = words.into_iter().map(String::from).collect();
            index.add_document(id, &tokens, Record::new()).unwrap();
        }
        index
    }

    pub fn query(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }
}
