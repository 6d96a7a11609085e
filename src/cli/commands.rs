//! Command implementations for the Scout CLI.

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::analysis::StopWords;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::load_records;
use crate::error::Result;
use crate::index::RecordPolicy;
use crate::ranking::{
    Bm25Ranking, CompositeRanking, RankingStrategy, RecencyRanking, RobustRanking,
    TermFrequencyRanking, TfIdfRanking,
};
use crate::search::{SearchConfig, SearchEngine, explain_query};
use crate::storage::FileStorage;

/// Execute a CLI command.
pub fn execute_command(args: &ScoutArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_records(search_args, args),
        Command::Index(index_args) => build_index(index_args, args),
        Command::Query(query_args) => query_index(query_args, args),
    }
}

/// Build the ranking strategy selected on the command line.
///
/// The fusion ranking boosts recent documents relative to the current time.
pub fn build_ranking(options: &RankingOptions) -> Result<Box<dyn RankingStrategy>> {
    let ranking: Box<dyn RankingStrategy> = match options.ranking {
        RankingKind::Tf => Box::new(TermFrequencyRanking::new()),
        RankingKind::Tfidf => Box::new(TfIdfRanking::new()),
        RankingKind::Bm25 => Box::new(Bm25Ranking::new(options.k1, options.b)?),
        RankingKind::Robust => Box::new(RobustRanking::default()),
        RankingKind::Fusion => Box::new(CompositeRanking::new(
            vec![
                Box::new(Bm25Ranking::new(options.k1, options.b)?),
                Box::new(RobustRanking::default()),
            ],
            vec![0.5, 0.5],
            Some(RecencyRanking::new(options.decay_days, 1.0, Utc::now())?),
        )?),
    };
    Ok(ranking)
}

/// Translate build options into an engine configuration.
pub fn build_config(options: &BuildOptions) -> SearchConfig {
    let mut config = SearchConfig::new().ngram(options.ngram);
    if !options.fields.is_empty() {
        config = config.fields(options.fields.iter().cloned());
    }
    for (field, weight) in &options.field_weights {
        config = config.field_weight(field.clone(), *weight);
    }
    if let Some(words) = &options.stopwords {
        config = config.stopwords(StopWords::from_words(words.iter().cloned()));
    }
    if options.strict {
        config = config.record_policy(RecordPolicy::Fail);
    }
    config
}

/// Build an engine from a records file and run one query.
fn search_records(args: &SearchArgs, cli_args: &ScoutArgs) -> Result<()> {
    let records = load_records(&args.records_file)?;
    info!(
        target: "scout::cli",
        path = %args.records_file.display(),
        records = records.len(),
        "Loaded records"
    );

    let ranking = build_ranking(&args.ranking)?;
    let engine = SearchEngine::from_records(records, ranking, build_config(&args.build))?;
    run_query(&engine, &args.query, &args.ranking, cli_args)
}

/// Build an engine from a records file and save it.
fn build_index(args: &IndexArgs, cli_args: &ScoutArgs) -> Result<()> {
    let start_time = Instant::now();
    let records = load_records(&args.records_file)?;

    // Ranking is not persisted; any strategy will do for building.
    let engine = SearchEngine::from_records(
        records,
        Box::new(RobustRanking::default()),
        build_config(&args.build),
    )?;
    let storage = FileStorage::new(&args.index_dir)?;
    engine.save(&storage, &args.key)?;

    let index = engine.index();
    let summary = IndexSummary {
        path: args.index_dir.display().to_string(),
        key: args.key.clone(),
        documents: index.total_docs(),
        vocabulary: index.vocabulary_size(),
        avg_doc_length: index.stats().avg_doc_length(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result(&summary, cli_args)
}

/// Load a saved engine and run one query.
fn query_index(args: &QueryArgs, cli_args: &ScoutArgs) -> Result<()> {
    let storage = FileStorage::new(&args.index_dir)?;
    let engine = SearchEngine::load(&storage, &args.key, build_ranking(&args.ranking)?)?;
    run_query(&engine, &args.query, &args.ranking, cli_args)
}

fn run_query(engine: &SearchEngine, query: &str, options: &RankingOptions, cli_args: &ScoutArgs) -> Result<()> {
    let start_time = Instant::now();
    let hits = if options.explain {
        explain_query(engine, query, options.limit)?
    } else {
        engine.search(query, options.limit)?
    };

    let results = SearchResults {
        query: query.to_string(),
        ranking: engine.ranking().name().to_string(),
        total_hits: hits.len(),
        hits,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result(&results, cli_args)
}
