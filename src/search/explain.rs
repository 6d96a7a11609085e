//! Query explanation.

use crate::error::Result;
use crate::ranking::RankingResult;
use crate::search::engine::{SearchEngine, SearchHit};

/// Run `query` and make every query word visible in the breakdown.
///
/// Each hit's `components` and `per_term` gain a zero / empty entry for every
/// lowercased, whitespace-separated query word the ranking did not report,
/// so stop words, misses and operators show up explicitly. Scores and
/// ordering are those of [`SearchEngine::search`]; the engine is not
/// modified.
pub fn explain_query(engine: &SearchEngine, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    let hits = engine.search(query, limit)?;
    Ok(hits
        .into_iter()
        .map(|hit| {
            let (score, mut components, mut per_term) = hit.result.into_parts();
            for word in &words {
                components.entry(word.clone()).or_insert(0.0);
                per_term.entry(word.clone()).or_default();
            }
            SearchHit {
                doc_id: hit.doc_id,
                result: RankingResult::new(score, components).with_per_term(per_term),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::Record;
    use crate::ranking::Bm25Ranking;
    use crate::search::SearchConfig;

    #[test]
    fn test_explain_pads_query_words() {
        let records: Vec<Record> = vec![
            serde_json::from_value(json!({"id": 1, "text": "the quick fox"})).unwrap(),
            serde_json::from_value(json!({"id": 2, "text": "slow dog"})).unwrap(),
        ];
        let engine =
            SearchEngine::from_records(records, Box::new(Bm25Ranking::default()), SearchConfig::new()).unwrap();

        let plain = engine.search("The fox OR cat", 5).unwrap();
        let explained = explain_query(&engine, "The fox OR cat", 5).unwrap();
        assert_eq!(explained.len(), plain.len());

        let hit = &explained[0];
        assert_eq!(hit.doc_id, "1");
        assert_eq!(hit.score(), plain[0].score());
        for word in ["the", "fox", "or", "cat"] {
            assert!(hit.result.components().contains_key(word), "{word}");
            assert!(hit.result.per_term().contains_key(word), "{word}");
        }
        assert_eq!(hit.result.components()["cat"], 0.0);
        assert!(hit.result.per_term()["cat"].is_empty());
        // Existing breakdowns are untouched.
        assert_eq!(hit.result.per_term()["fox"], plain[0].result.per_term()["fox"]);
        assert_eq!(hit.result.components()["bm25"], plain[0].result.components()["bm25"]);
    }
}
