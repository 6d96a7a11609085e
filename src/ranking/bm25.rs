//! Okapi BM25 scoring.

use crate::error::{Result, ScoutError};
use crate::index::InvertedIndex;
use crate::ranking::{Components, PerTerm, RankingResult, RankingStrategy};

/// Default term-frequency saturation.
pub const DEFAULT_K1: f64 = 1.5;

/// Default length normalization.
pub const DEFAULT_B: f64 = 0.75;

/// BM25 ranking strategy.
///
/// For each query token with `tf > 0` and `df > 0`:
///
/// ```text
/// idf   = ln((N - df + 0.5) / (df + 0.5) + 1)
/// score = idf · tf · (k1 + 1) / (tf + k1 · (1 - b + b · len / avg_len))
/// ```
///
/// Components are `{"bm25": total, "k1": k1, "b": b}`; `per_term` holds
/// `{tf, df, idf, score}` for every contributing token.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Ranking {
    k1: f64,
    b: f64,
}

impl Default for Bm25Ranking {
    fn default() -> Self {
        Bm25Ranking {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }
}

impl Bm25Ranking {
    /// Create a BM25 ranking with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `k1 >= 0` and `0 <= b <= 1`.
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        if !(k1.is_finite() && k1 >= 0.0) {
            return Err(ScoutError::config(format!("BM25 k1 must be >= 0, got {k1}")));
        }
        if !(0.0..=1.0).contains(&b) {
            return Err(ScoutError::config(format!("BM25 b must be in [0, 1], got {b}")));
        }
        Ok(Bm25Ranking { k1, b })
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f64 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f64 {
        self.b
    }

    fn idf(total_docs: f64, df: f64) -> f64 {
        ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

impl RankingStrategy for Bm25Ranking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let stats = index.stats();
        let total_docs = stats.total_docs as f64;
        let avg_len = stats.avg_doc_length();
        let doc_len = stats
            .doc_length(doc_id)
            .map_or(avg_len, |len| len as f64);
        let norm = 1.0 - self.b + self.b * (doc_len / avg_len);

        let mut total = 0.0;
        let mut per_term = PerTerm::new();

        for token in query_tokens {
            let tf = index.term_frequency(doc_id, token);
            let df = index.doc_freq(token);
            if tf == 0 || df == 0 {
                continue;
            }

            let tf = f64::from(tf);
            let df = df as f64;
            let idf = Self::idf(total_docs, df);
            let score = idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm);

            total += score;
            per_term.insert(
                token.clone(),
                Components::from([
                    ("tf".to_string(), tf),
                    ("df".to_string(), df),
                    ("idf".to_string(), idf),
                    ("score".to_string(), score),
                ]),
            );
        }

        let components = Components::from([
            ("bm25".to_string(), total),
            ("k1".to_string(), self.k1),
            ("b".to_string(), self.b),
        ]);
        RankingResult::new(total, components).with_per_term(per_term)
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}
