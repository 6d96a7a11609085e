//! Fixed blend of term frequency and TF-IDF.

use crate::index::InvertedIndex;
use crate::ranking::tf::TermFrequencyRanking;
use crate::ranking::tfidf::TfIdfRanking;
use crate::ranking::{Components, RankingResult, RankingStrategy};

/// `score = tf_weight · TF + tfidf_weight · TF-IDF`.
///
/// Components are the unweighted `{"tf", "tfidf"}` scores.
#[derive(Debug, Clone, Copy)]
pub struct RobustRanking {
    tf_weight: f64,
    tfidf_weight: f64,
}

impl Default for RobustRanking {
    fn default() -> Self {
        RobustRanking::new(0.4, 0.6)
    }
}

impl RobustRanking {
    /// Create a robust ranking mixing TF and TF-IDF with the given weights.
    pub fn new(tf_weight: f64, tfidf_weight: f64) -> Self {
        RobustRanking {
            tf_weight,
            tfidf_weight,
        }
    }
}

impl RankingStrategy for RobustRanking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let tf = TermFrequencyRanking.score(query_tokens, index, doc_id).score();
        let tfidf = TfIdfRanking.score(query_tokens, index, doc_id).score();

        let score = self.tf_weight * tf + self.tfidf_weight * tfidf;
        let components = Components::from([("tf".to_string(), tf), ("tfidf".to_string(), tfidf)]);
        RankingResult::new(score, components)
    }

    fn name(&self) -> &'static str {
        "robust"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{query, sample_index};

    #[test]
    fn test_default_blend() {
        let index = sample_index();
        let tokens = query(&["fox"]);
        let result = RobustRanking::default().score(&tokens, &index, "2");

        let tfidf = (4.0f64 / 3.0).ln() + 1.0;
        assert!((result.score() - (0.4 + 0.6 * tfidf)).abs() < 1e-12);
        assert_eq!(result.components()["tf"], 1.0);
        assert!((result.components()["tfidf"] - tfidf).abs() < 1e-12);
    }

    #[test]
    fn test_no_match() {
        let index = sample_index();
        let result = RobustRanking::default().score(&query(&["fox"]), &index, "3");
        assert_eq!(result.score(), 0.0);
    }
}
