//! Command line argument parsing for the Scout CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_LIMIT;

/// Key snapshots are stored under inside an index directory.
pub const DEFAULT_INDEX_KEY: &str = "index.json";

/// Scout - an embeddable full-text search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "scout")]
#[command(about = "Build, save and query full-text indexes over JSON records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ScoutArgs {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ScoutArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=info, 3=debug, 4=trace)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a records file and run one query against it
    Search(SearchArgs),

    /// Build an index from a records file and save it to a directory
    Index(IndexArgs),

    /// Query an index saved with `index`
    Query(QueryArgs),
}

/// How records are turned into an index.
#[derive(Args, Debug, Clone)]
pub struct BuildOptions {
    /// Fields to index (comma-separated, default: weighted fields or "text")
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Field weight as FIELD=WEIGHT (repeatable)
    #[arg(long = "field-weight", value_name = "FIELD=WEIGHT", value_parser = parse_field_weight)]
    pub field_weights: Vec<(String, f64)>,

    /// Word n-gram size
    #[arg(long)]
    pub ngram: Option<usize>,

    /// Stop words (comma-separated, replaces the defaults)
    #[arg(long, value_delimiter = ',')]
    pub stopwords: Option<Vec<String>>,

    /// Fail on malformed records instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

/// How results are ranked and presented.
#[derive(Args, Debug, Clone)]
pub struct RankingOptions {
    /// Ranking strategy
    #[arg(short, long, default_value = "robust")]
    pub ranking: RankingKind,

    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = crate::ranking::bm25::DEFAULT_K1)]
    pub k1: f64,

    /// BM25 length normalization
    #[arg(long, default_value_t = crate::ranking::bm25::DEFAULT_B)]
    pub b: f64,

    /// Recency decay in days (fusion only)
    #[arg(long, default_value_t = 30.0)]
    pub decay_days: f64,

    /// Maximum number of results to return
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Pad the score breakdown with every query word
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `search`
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Records file (.json array or .jsonl)
    #[arg(value_name = "RECORDS_FILE")]
    pub records_file: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[command(flatten)]
    pub build: BuildOptions,

    #[command(flatten)]
    pub ranking: RankingOptions,
}

/// Arguments for `index`
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Records file (.json array or .jsonl)
    #[arg(value_name = "RECORDS_FILE")]
    pub records_file: PathBuf,

    /// Directory to save the index into
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Storage key of the snapshot
    #[arg(long, default_value = DEFAULT_INDEX_KEY)]
    pub key: String,

    #[command(flatten)]
    pub build: BuildOptions,
}

/// Arguments for `query`
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Directory holding a saved index
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Storage key of the snapshot
    #[arg(long, default_value = DEFAULT_INDEX_KEY)]
    pub key: String,

    #[command(flatten)]
    pub ranking: RankingOptions,
}

/// Ranking strategies available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingKind {
    /// Raw term frequency
    Tf,
    /// Smoothed TF-IDF
    Tfidf,
    /// Okapi BM25
    Bm25,
    /// 0.4 TF + 0.6 TF-IDF
    Robust,
    /// Equal blend of BM25 and robust, plus a recency boost
    Fusion,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn parse_field_weight(value: &str) -> std::result::Result<(String, f64), String> {
    let (field, weight) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=WEIGHT, got '{value}'"))?;
    let weight: f64 = weight
        .parse()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    if field.is_empty() {
        return Err("field name is empty".to_string());
    }
    Ok((field.to_string(), weight))
}
