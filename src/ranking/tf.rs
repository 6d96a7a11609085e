//! Pure term-frequency scoring.

use crate::index::InvertedIndex;
use crate::ranking::{Components, RankingResult, RankingStrategy};

/// Scores a document by the summed raw frequency of the query tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyRanking;

impl TermFrequencyRanking {
    /// Create a term-frequency ranking.
    pub fn new() -> Self {
        TermFrequencyRanking
    }
}

impl RankingStrategy for TermFrequencyRanking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let mut score = 0.0;
        let mut components = Components::new();

        for token in query_tokens {
            let tf = index.term_frequency(doc_id, token);
            if tf == 0 {
                continue;
            }
            score += f64::from(tf);
            *components.entry(token.clone()).or_insert(0.0) += f64::from(tf);
        }

        RankingResult::new(score, components)
    }

    fn name(&self) -> &'static str {
        "tf"
    }
}
