//! CSV/TSV loader with delimiter detection and per-column typing.

use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use super::source::SourceMetadata;
use crate::dataset::{Dataset, Value, ValueKind};
use crate::error::{NormformError, Result};

/// Delimiters to try when auto-detecting, in order of preference on ties.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled by delimiter detection.
const SAMPLE_LINES: usize = 10;

/// Bytes sampled by delimiter detection.
const SAMPLE_BYTES: usize = 64 * 1024;

/// Cell contents read as missing, as `pandas.read_csv` does by default.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Read JSON arrays and objects in cells as composite values.
    pub composite_values: bool,
    /// Trimmed cell contents read as missing. Empty cells always are.
    pub null_tokens: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            composite_values: false,
            null_tokens: NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// A cell before its column's kind is known.
enum Cell<'r> {
    Missing,
    Composite(Value),
    Scalar(&'r str),
}

/// Loads delimited text files into a [`Dataset`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and its metadata.
    ///
    /// The dataset is named after the file name.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| NormformError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let delimiter = self.delimiter_for(&name, &contents)?;
        let (dataset, kinds) = self.parse_bytes(&name, &contents, delimiter)?;

        tracing::debug!(
            dataset = %name,
            rows = dataset.row_count(),
            attributes = dataset.attribute_count(),
            delimiter = ?(delimiter as char),
            "Loaded dataset"
        );

        let metadata =
            SourceMetadata::describe(path.to_path_buf(), &contents, delimiter, &dataset, &kinds);
        Ok((dataset, metadata))
    }

    /// Parse in-memory text as a named dataset.
    pub fn parse_str(&self, name: &str, text: &str) -> Result<Dataset> {
        let bytes = text.as_bytes();
        let delimiter = self.delimiter_for(name, bytes)?;
        self.parse_bytes(name, bytes, delimiter)
            .map(|(dataset, _)| dataset)
    }

    fn delimiter_for(&self, name: &str, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => self
                .detect_delimiter(bytes)
                .ok_or_else(|| NormformError::EmptyData(format!("{}: no lines to analyze", name))),
        }
    }

    /// Pick the candidate delimiter that splits the most sampled lines into
    /// as many fields as the header, preferring wider headers.
    ///
    /// Returns `None` when there are no non-blank lines.
    fn detect_delimiter(&self, bytes: &[u8]) -> Option<u8> {
        let sample = String::from_utf8_lossy(&bytes[..bytes.len().min(SAMPLE_BYTES)]);
        let lines: Vec<&str> = sample
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(SAMPLE_LINES)
            .collect();
        let header = lines.first()?;

        let best = DELIMITERS
            .iter()
            .enumerate()
            .filter_map(|(rank, &delim)| {
                let width = field_count(header, delim, self.config.quote);
                if width < 2 {
                    return None;
                }
                let agreeing = lines
                    .iter()
                    .filter(|line| field_count(line, delim, self.config.quote) == width)
                    .count();
                Some(((agreeing, width, Reverse(rank)), delim))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, delim)| delim);

        // A single-column file splits on nothing.
        Some(best.unwrap_or(b','))
    }

    fn parse_bytes(
        &self,
        name: &str,
        bytes: &[u8],
        delimiter: u8,
    ) -> Result<(Dataset, Vec<ValueKind>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(NormformError::EmptyData(format!("{}: no columns found", name)));
        }

        let width = headers.len();
        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            if record.len() != width {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(row_idx as u64 + 2);
                return Err(NormformError::malformed(
                    name,
                    format!("line {} has {} fields, expected {}", line, record.len(), width),
                ));
            }
            records.push(record);
        }

        let cells: Vec<Vec<Cell<'_>>> = records
            .iter()
            .map(|record| record.iter().map(|field| self.read_cell(field)).collect())
            .collect();

        let kinds: Vec<ValueKind> = (0..width)
            .map(|col| {
                ValueKind::infer_column(cells.iter().filter_map(|row| match &row[col] {
                    Cell::Scalar(raw) => Some(*raw),
                    _ => None,
                }))
            })
            .collect();

        let rows = cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kinds)
                    .map(|(cell, &kind)| match cell {
                        Cell::Missing => Value::Missing,
                        Cell::Composite(value) => value,
                        Cell::Scalar(raw) => Value::parse_as(raw, kind),
                    })
                    .collect()
            })
            .collect();

        Ok((Dataset::new(name, headers, rows)?, kinds))
    }

    fn read_cell<'r>(&self, field: &'r str) -> Cell<'r> {
        let trimmed = field.trim();
        if trimmed.is_empty() || self.config.null_tokens.iter().any(|t| t == trimmed) {
            return Cell::Missing;
        }
        if self.config.composite_values && (trimmed.starts_with('[') || trimmed.starts_with('{')) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
                return Cell::Composite(Value::from_json(json));
            }
        }
        Cell::Scalar(field)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields in `line` when split on `delimiter` outside `quote`d runs.
fn field_count(line: &str, delimiter: u8, quote: u8) -> usize {
    let mut quoted = false;
    1 + line
        .bytes()
        .filter(|&b| {
            if b == quote {
                quoted = !quoted;
            }
            b == delimiter && !quoted
        })
        .count()
}
