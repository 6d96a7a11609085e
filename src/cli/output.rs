//! Output formatting for CLI commands.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ScoutArgs};
use crate::error::Result;
use crate::search::SearchHit;

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub ranking: String,
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,
    pub duration_ms: u64,
}

/// Result structure for index builds.
#[derive(Debug, Serialize)]
pub struct IndexSummary {
    pub path: String,
    pub key: String,
    pub documents: usize,
    pub vocabulary: usize,
    pub avg_doc_length: f64,
    pub duration_ms: u64,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write, args: &ScoutArgs) -> Result<()>;
}

/// Output a result in the requested format on stdout.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &ScoutArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, result, args)
}

/// Write a result in the requested format.
pub fn write_result<T: Serialize + HumanOutput>(
    out: &mut dyn Write,
    result: &T,
    args: &ScoutArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => result.write_human(out, args),
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
            Ok(())
        }
    }
}

impl HumanOutput for SearchResults {
    fn write_human(&self, out: &mut dyn Write, args: &ScoutArgs) -> Result<()> {
        if self.hits.is_empty() {
            writeln!(out, "No results for '{}'", self.query)?;
            return Ok(());
        }

        writeln!(out, "{:>4}  {:<20} {:>10}", "#", "Doc ID", "Score")?;
        writeln!(out, "{}", "─".repeat(36))?;
        for (rank, hit) in self.hits.iter().enumerate() {
            writeln!(out, "{:>4}  {:<20} {:>10.4}", rank + 1, hit.doc_id, hit.score())?;

            if args.verbosity() > 1 {
                for (name, value) in hit.result.components() {
                    writeln!(out, "        {name}: {value:.4}")?;
                }
                for (token, breakdown) in hit.result.per_term() {
                    let parts: Vec<String> = breakdown
                        .iter()
                        .map(|(key, value)| format!("{key}={value:.4}"))
                        .collect();
                    writeln!(out, "        [{token}] {}", parts.join(" "))?;
                }
            }
        }

        if args.verbosity() > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "{} hits ({} ranking, {}ms)",
                self.total_hits, self.ranking, self.duration_ms
            )?;
        }
        Ok(())
    }
}

impl HumanOutput for IndexSummary {
    fn write_human(&self, out: &mut dyn Write, args: &ScoutArgs) -> Result<()> {
        writeln!(out, "Saved index to {} ({})", self.path, self.key)?;
        if args.verbosity() > 0 {
            writeln!(out, "  documents:      {}", self.documents)?;
            writeln!(out, "  vocabulary:     {}", self.vocabulary)?;
            writeln!(out, "  avg doc length: {:.2}", self.avg_doc_length)?;
            writeln!(out, "  build time:     {}ms", self.duration_ms)?;
        }
        Ok(())
    }
}
