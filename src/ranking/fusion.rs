//! Weighted linear combination of ranking strategies.

use std::collections::HashMap;

use crate::error::{Result, ScoutError};
use crate::index::InvertedIndex;
use crate::ranking::recency::RecencyRanking;
use crate::ranking::{Components, PerTerm, RankingResult, RankingStrategy};

/// `score = Σ weight_i · strategy_i.score`.
///
/// Each strategy's weighted score is recorded under its name in the
/// components; when the same strategy kind appears more than once the later
/// occurrences are keyed `name#i` with `i` the strategy's position. Per-term
/// breakdowns are merged token by token, later strategies overwriting
/// conflicting keys.
///
/// # Examples
///
/// ```
/// use scout::ranking::{Bm25Ranking, FusionRanking, RobustRanking};
///
/// let fusion = FusionRanking::new(
///     vec![Box::new(Bm25Ranking::default()), Box::new(RobustRanking::default())],
///     vec![0.5, 0.5],
/// )
/// .unwrap();
/// assert_eq!(fusion.len(), 2);
///
/// // Every strategy needs a weight.
/// assert!(FusionRanking::new(vec![Box::new(Bm25Ranking::default())], vec![]).is_err());
/// ```
#[derive(Debug)]
pub struct FusionRanking {
    strategies: Vec<Box<dyn RankingStrategy>>,
    weights: Vec<f64>,
    keys: Vec<String>,
}

impl FusionRanking {
    /// Create a fusion of `strategies`, weighted by the parallel `weights`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the two lists differ in length.
    pub fn new(strategies: Vec<Box<dyn RankingStrategy>>, weights: Vec<f64>) -> Result<Self> {
        if strategies.len() != weights.len() {
            return Err(ScoutError::config(format!(
                "fusion needs one weight per strategy: {} strategies, {} weights",
                strategies.len(),
                weights.len()
            )));
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let keys = strategies
            .iter()
            .enumerate()
            .map(|(position, strategy)| {
                let count = seen.entry(strategy.name()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    strategy.name().to_string()
                } else {
                    format!("{}#{position}", strategy.name())
                }
            })
            .collect();

        Ok(FusionRanking {
            strategies,
            weights,
            keys,
        })
    }

    /// Number of combined strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategy is combined.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Component keys, in strategy order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn combine(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> (f64, Components, PerTerm) {
        let mut total = 0.0;
        let mut components = Components::new();
        let mut per_term = PerTerm::new();

        for ((strategy, weight), key) in self.strategies.iter().zip(&self.weights).zip(&self.keys) {
            let (score, _, terms) = strategy.score(query_tokens, index, doc_id).into_parts();
            let weighted = weight * score;
            total += weighted;
            components.insert(key.clone(), weighted);
            for (token, breakdown) in terms {
                per_term.entry(token).or_default().extend(breakdown);
            }
        }

        (total, components, per_term)
    }
}

impl RankingStrategy for FusionRanking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let (total, components, per_term) = self.combine(query_tokens, index, doc_id);
        RankingResult::new(total, components).with_per_term(per_term)
    }

    fn name(&self) -> &'static str {
        "fusion"
    }
}

/// A [`FusionRanking`] with an optional, unweighted recency booster.
///
/// The booster's score is added to the fused total and recorded as the
/// `"recency"` component.
#[derive(Debug)]
pub struct CompositeRanking {
    fusion: FusionRanking,
    recency: Option<RecencyRanking>,
}

impl CompositeRanking {
    /// Create a composite ranking.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `strategies` and `weights` differ in
    /// length.
    pub fn new(
        strategies: Vec<Box<dyn RankingStrategy>>,
        weights: Vec<f64>,
        recency: Option<RecencyRanking>,
    ) -> Result<Self> {
        Ok(CompositeRanking {
            fusion: FusionRanking::new(strategies, weights)?,
            recency,
        })
    }

    /// The recency booster, if any.
    pub fn recency(&self) -> Option<&RecencyRanking> {
        self.recency.as_ref()
    }
}

impl RankingStrategy for CompositeRanking {
    fn score(&self, query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let (mut total, mut components, per_term) = self.fusion.combine(query_tokens, index, doc_id);

        if let Some(recency) = &self.recency {
            let boost = recency.score(query_tokens, index, doc_id).score();
            total += boost;
            components.insert(recency.name().to_string(), boost);
        }

        RankingResult::new(total, components).with_per_term(per_term)
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}
