//! TF-IDF scoring with smoothed inverse document frequency.

use crate::index::InvertedIndex;
use crate::ranking::{Components, RankingResult, RankingStrategy};

/// `score = Σ tf · idf` with `idf = ln((N + 1) / (df + 1)) + 1`.
///
/// The smoothing keeps idf strictly positive, so a token present in every
/// document still contributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfRanking;

impl TfIdfRanking {
    /// Create a TF-IDF ranking.
    pub fn new() -> Self {
        TfIdfRanking
    }

    /// Smoothed idf for a token with document frequency `df` in a corpus of
    /// `total_docs` documents.
    pub fn idf(total_docs: usize, df: usize) -> f64 {
        ((total_docs as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
    }
}

impl RankingStrategy for TfIdfRanking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let total_docs = index.total_docs();
        let mut score = 0.0;
        let mut components = Components::new();

        for token in query_tokens {
            let df = index.doc_freq(token);
            if df == 0 {
                continue;
            }
            let tf = index.term_frequency(doc_id, token);
            if tf == 0 {
                continue;
            }
            let contribution = f64::from(tf) * Self::idf(total_docs, df);
            score += contribution;
            *components.entry(token.clone()).or_insert(0.0) += contribution;
        }

        RankingResult::new(score, components)
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}
