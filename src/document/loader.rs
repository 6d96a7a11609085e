//! Loading records from JSON and JSON Lines files.
//!
//! ```jsonl
//! {"id": 1, "text": "the quick brown fox"}
//! {"id": 2, "text": "jumps over the lazy dog"}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::Record;
use crate::error::{Result, ScoutError};

/// Streams records from a JSON Lines source, one object per line.
///
/// Blank lines are skipped. A line that is not a JSON object yields an error
/// for that line; iteration can continue past it.
#[derive(Debug)]
pub struct JsonLinesReader<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> JsonLinesReader<R> {
    /// Create a new reader over a buffered source.
    pub fn new(reader: R) -> Self {
        JsonLinesReader {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    fn parse_line(&self, line: &str) -> Result<Record> {
        match serde_json::from_str::<Value>(line)? {
            Value::Object(map) => Ok(map),
            other => Err(ScoutError::invalid_record(format!(
                "line {}: expected a JSON object, found {}",
                self.line_number,
                json_kind(&other)
            ))),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(self.parse_line(line));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Load every record from a file.
///
/// Files ending in `.jsonl` or `.ndjson` are read line by line; anything else
/// is parsed as a JSON array of objects. Array entries that are not objects
/// are skipped with a warning.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let is_json_lines = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("jsonl") | Some("ndjson")
    );

    let reader = BufReader::new(File::open(path)?);
    let records = if is_json_lines {
        JsonLinesReader::new(reader).collect::<Result<Vec<_>>>()?
    } else {
        match serde_json::from_reader::<_, Value>(reader)? {
            Value::Array(values) => values
                .into_iter()
                .enumerate()
                .filter_map(|(position, value)| match value {
                    Value::Object(map) => Some(map),
                    other => {
                        warn!(
                            target: "scout::document",
                            position,
                            kind = json_kind(&other),
                            "Skipping non-object entry in records file"
                        );
                        None
                    }
                })
                .collect(),
            other => {
                return Err(ScoutError::invalid_record(format!(
                    "{}: expected a JSON array of records, found {}",
                    path.display(),
                    json_kind(&other)
                )));
            }
        }
    };

    debug!(
        target: "scout::document",
        path = %path.display(),
        records = records.len(),
        "Loaded records"
    );
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
