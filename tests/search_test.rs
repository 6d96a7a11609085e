//! End-to-end search behavior over small record sets.

use scout::prelude::*;
use serde_json::{Value, json};

fn records(values: Value) -> Vec<Record> {
    serde_json::from_value(values).unwrap()
}

fn engine(values: Value, ranking: Box<dyn RankingStrategy>) -> SearchEngine {
    SearchEngine::from_records(records(values), ranking, SearchConfig::new()).unwrap()
}

fn ids(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.doc_id.as_str()).collect()
}

fn corpus() -> Value {
    json!([
        {"id": 1, "text": "The quick brown fox jumps over the lazy dog"},
        {"id": 2, "text": "A quick brown dog outpaces a lazy fox"},
        {"id": 3, "text": "The fox and the hound are friends"},
        {"id": 4, "text": "Brown bears eat apples"},
    ])
}

#[test]
fn test_ties_break_by_doc_id() -> Result<()> {
    let engine = engine(
        json!([{"id": 2, "text": "fox"}, {"id": 1, "text": "fox"}]),
        Box::new(RobustRanking::default()),
    );

    let first = engine.search("fox", 10)?;
    assert_eq!(ids(&first), vec!["1", "2"]);
    assert_eq!(first[0].score(), first[1].score());

    for _ in 0..5 {
        let again = engine.search("fox", 10)?;
        assert_eq!(ids(&again), ids(&first));
    }
    Ok(())
}

#[test]
fn test_or_query() -> Result<()> {
    let engine = engine(
        json!([
            {"id": "a", "text": "apple pie"},
            {"id": "b", "text": "orange juice"},
            {"id": "c", "text": "grape soda"},
        ]),
        Box::new(TfIdfRanking::new()),
    );

    let hits = engine.search("apple OR orange", 10)?;
    assert_eq!(hits.len(), 2);
    let mut found = ids(&hits);
    found.sort();
    assert_eq!(found, vec!["a", "b"]);
    Ok(())
}

#[test]
fn test_required_terms_are_conjunctive() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let mut found = ids(&engine.search("fox dog", 10)?)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    found.sort();
    assert_eq!(found, vec!["1", "2"]);
    Ok(())
}

#[test]
fn test_exclusion() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let hits = engine.search("fox -lazy", 10)?;
    assert_eq!(ids(&hits), vec!["3"]);
    Ok(())
}

#[test]
fn test_phrase_query() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let hits = engine.search("\"quick brown fox\"", 10)?;
    assert_eq!(ids(&hits), vec!["1"]);

    // Both documents contain the words, only one has them in order.
    let hits = engine.search("\"lazy fox\"", 10)?;
    assert_eq!(ids(&hits), vec!["2"]);
    Ok(())
}

#[test]
fn test_stopwords_do_not_change_results() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let plain = engine.search("fox", 10)?;
    let with_stopword = engine.search("the fox", 10)?;
    assert!(!plain.is_empty());
    assert_eq!(ids(&plain), ids(&with_stopword));
    for (a, b) in plain.iter().zip(&with_stopword) {
        assert_eq!(a.score(), b.score());
    }

    assert!(engine.search("the", 10)?.is_empty());
    Ok(())
}

#[test]
fn test_stopword_term_does_not_fall_back_to_phrase() -> Result<()> {
    let engine = engine(
        json!([{"id": 1, "text": "the quick fox"}, {"id": 2, "text": "slow dog"}]),
        Box::new(TermFrequencyRanking::new()),
    );

    assert_eq!(ids(&engine.search("\"quick fox\"", 10)?), vec!["1"]);
    assert!(engine.search("the \"quick fox\"", 10)?.is_empty());
    Ok(())
}

#[test]
fn test_or_without_terms_matches_nothing() -> Result<()> {
    let engine = engine(
        json!([{"id": 1, "text": "the quick fox"}, {"id": 2, "text": "slow dog"}]),
        Box::new(TermFrequencyRanking::new()),
    );

    assert!(engine.search("OR \"quick fox\"", 10)?.is_empty());
    // Candidates come from the terms; the phrase still has to match.
    assert_eq!(ids(&engine.search("fox OR \"quick fox\"", 10)?), vec!["1"]);
    assert!(engine.search("slow OR \"quick fox\"", 10)?.is_empty());
    Ok(())
}

#[test]
fn test_limit() -> Result<()> {
    let engine = engine(corpus(), Box::new(TermFrequencyRanking::new()));

    assert_eq!(engine.search("fox", 2)?.len(), 2);
    assert!(engine.search("fox", 0)?.is_empty());
    Ok(())
}

#[test]
fn test_unknown_terms() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    assert!(engine.search("zebra", 10)?.is_empty());
    assert!(engine.search("fox zebra", 10)?.is_empty());
    assert!(engine.search("", 10)?.is_empty());
    Ok(())
}

#[test]
fn test_results_sorted_by_score() -> Result<()> {
    let engine = engine(
        json!([
            {"id": 1, "text": "fox"},
            {"id": 2, "text": "fox fox fox"},
            {"id": 3, "text": "fox fox"},
        ]),
        Box::new(TermFrequencyRanking::new()),
    );

    let hits = engine.search("fox", 10)?;
    assert_eq!(ids(&hits), vec!["2", "3", "1"]);
    assert!(hits.windows(2).all(|w| w[0].score() >= w[1].score()));
    Ok(())
}

#[test]
fn test_field_weights() -> Result<()> {
    let config = SearchConfig::new()
        .field_weight("title", 3.0)
        .field_weight("body", 1.0);
    let engine = SearchEngine::from_records(
        records(json!([
            {"id": "t", "title": "rust", "body": "systems"},
            {"id": "b", "title": "systems", "body": "rust"},
        ])),
        Box::new(TermFrequencyRanking::new()),
        config,
    )?;

    let hits = engine.search("rust", 10)?;
    assert_eq!(ids(&hits), vec!["t", "b"]);
    assert_eq!(hits[0].score(), 3.0);
    assert_eq!(hits[1].score(), 1.0);
    Ok(())
}

#[test]
fn test_fusion_ranking() -> Result<()> {
    let fusion = FusionRanking::new(
        vec![Box::new(Bm25Ranking::default()), Box::new(TfIdfRanking::new())],
        vec![0.7, 0.3],
    )?;
    let engine = engine(corpus(), Box::new(fusion));

    let hits = engine.search("fox", 10)?;
    assert_eq!(hits.len(), 3);
    let components = hits[0].result.components();
    assert!(components.contains_key("bm25"));
    assert!(components.contains_key("tfidf"));
    Ok(())
}

#[test]
fn test_explain_query_pads_components() -> Result<()> {
    let engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let hits = explain_query(&engine, "fox hound", 10)?;
    assert_eq!(ids(&hits), vec!["3"]);
    let per_term = hits[0].result.per_term();
    assert!(per_term.contains_key("fox"));
    assert!(per_term.contains_key("hound"));
    Ok(())
}

#[test]
fn test_incremental_document_is_searchable() -> Result<()> {
    let mut engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let record: Record = serde_json::from_value(json!({"text": "A silver fox in the snow"}))?;
    engine.add_document("5", record, None)?;

    let hits = engine.search("silver", 10)?;
    assert_eq!(ids(&hits), vec!["5"]);
    let hits = engine.search("\"silver fox\"", 10)?;
    assert_eq!(ids(&hits), vec!["5"]);
    assert_eq!(engine.search("fox", 10)?.len(), 4);
    Ok(())
}

#[test]
fn test_duplicate_document_rejected() -> Result<()> {
    let mut engine = engine(corpus(), Box::new(Bm25Ranking::default()));

    let record: Record = serde_json::from_value(json!({"text": "again"}))?;
    let err = engine.add_document("1", record, None).unwrap_err();
    assert!(matches!(err, ScoutError::DuplicateDocument(id) if id == "1"));
    assert!(engine.search("again", 10)?.is_empty());
    Ok(())
}

#[test]
fn test_phrase_without_token_history() -> Result<()> {
    let built = engine(corpus(), Box::new(Bm25Ranking::default()));
    let index = InvertedIndex::from_snapshot(built.index().to_snapshot())?;
    let bare = SearchEngine::with_index(index, Box::new(Bm25Ranking::default()), SearchConfig::new())?;

    assert!(!bare.has_token_history());
    assert_eq!(bare.search("fox", 10)?.len(), 3);
    assert!(matches!(
        bare.search("\"brown fox\"", 10),
        Err(ScoutError::MissingTokenHistory)
    ));
    Ok(())
}

#[test]
fn test_invalid_records_skipped_by_default() -> Result<()> {
    let values = json!([
        {"id": 1, "text": "good record"},
        {"text": "no id"},
        {"id": 3, "text": 42},
    ]);

    let engine = engine(values.clone(), Box::new(TermFrequencyRanking::new()));
    assert_eq!(engine.index().total_docs(), 1);

    let strict = SearchEngine::from_records(
        records(values),
        Box::new(TermFrequencyRanking::new()),
        SearchConfig::new().record_policy(RecordPolicy::Fail),
    );
    assert!(matches!(strict, Err(ScoutError::InvalidRecord(_))));
    Ok(())
}
