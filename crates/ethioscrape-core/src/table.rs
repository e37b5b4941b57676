//! Two-stage persistence of the processing pipeline.
//!
//! Stage one enriches the raw capture with the cleaned text and its token
//! lists and keeps the raw column, so the interim file can be inspected
//! against its input. Stage two drops the raw column from a copy of the
//! interim file; rerunning it is harmless.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ethioscrape_text::{preprocess_cell, ProcessedText};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_TEXT_COLUMN: &str = "message";
pub const DEFAULT_INTERIM_PATH: &str = "data/interim/tokenized_message.csv";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_PROCESSED_FILE: &str = "tokenized_message_processed.csv";

pub const CLEANED_COLUMN: &str = "cleaned_normalized_text";
pub const SENTENCES_COLUMN: &str = "tokenized_sentences";
pub const WORDS_COLUMN: &str = "tokenized_words";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token list serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{0}' not found in input table")]
    MissingColumn(String),
}

/// Where a stage wrote its table and what the table looked like.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

impl StageReport {
    fn new(path: &Path, df: &DataFrame) -> Self {
        Self {
            path: path.to_path_buf(),
            rows: df.height(),
            columns: column_names(df),
        }
    }
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Reads a CSV table with every column typed as text, so a text column that
/// happens to start with numbers-only rows is never inferred as numeric.
pub fn read_table(path: &Path) -> Result<DataFrame, TableError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Writes `df` as CSV, creating the parent directory when needed.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), TableError> {
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = File::create(path).map_err(io_err)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Encodes a token list as a JSON array so it survives a CSV round trip.
pub fn encode_tokens(tokens: &[String]) -> Result<String, TableError> {
    Ok(serde_json::to_string(tokens)?)
}

pub fn decode_tokens(cell: &str) -> Result<Vec<String>, TableError> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(cell)?)
}

/// Coerces `text_column` to non-null strings and appends the cleaned text,
/// sentence list and word list for every row, in row order.
pub fn enrich_frame(mut df: DataFrame, text_column: &str) -> Result<DataFrame, TableError> {
    if df.get_column_index(text_column).is_none() {
        return Err(TableError::MissingColumn(text_column.to_string()));
    }

    let coerced = df.column(text_column)?.cast(&DataType::String)?;
    let cells = coerced.str()?;
    debug!(
        column = text_column,
        nulls = coerced.null_count(),
        "Coerced text column to strings"
    );

    let rows = cells.len();
    let mut texts = Vec::with_capacity(rows);
    let mut cleaned = Vec::with_capacity(rows);
    let mut sentences = Vec::with_capacity(rows);
    let mut words = Vec::with_capacity(rows);

    for cell in cells.into_iter() {
        texts.push(cell.unwrap_or_default().to_string());
        let ProcessedText {
            cleaned: row_cleaned,
            sentences: row_sentences,
            words: row_words,
        } = preprocess_cell(cell);
        cleaned.push(row_cleaned);
        sentences.push(encode_tokens(&row_sentences)?);
        words.push(encode_tokens(&row_words)?);
    }

    df.with_column(Series::new(text_column.into(), texts))?;
    df.with_column(Series::new(CLEANED_COLUMN.into(), cleaned))?;
    df.with_column(Series::new(SENTENCES_COLUMN.into(), sentences))?;
    df.with_column(Series::new(WORDS_COLUMN.into(), words))?;
    Ok(df)
}

/// Drops `text_column` if the frame has it; otherwise returns the frame as is.
pub fn redact_frame(df: DataFrame, text_column: &str) -> Result<DataFrame, TableError> {
    if df.get_column_index(text_column).is_none() {
        debug!(column = text_column, "Column already absent, nothing to drop");
        return Ok(df);
    }
    Ok(df.drop(text_column)?)
}

/// Stage one: raw table in, interim table (raw column kept) out.
pub fn preprocess_table(
    input: &Path,
    interim: &Path,
    text_column: &str,
) -> Result<StageReport, TableError> {
    let raw = read_table(input)?;
    info!(path = %input.display(), rows = raw.height(), "Loaded raw table");

    let mut enriched = enrich_frame(raw, text_column)?;
    write_table(&mut enriched, interim)?;
    info!(path = %interim.display(), "Preprocessed data saved");

    Ok(StageReport::new(interim, &enriched))
}

/// Stage two: interim table in, processed table (raw column dropped) out.
pub fn finalize_table(
    interim: &Path,
    output_dir: &Path,
    file_name: &str,
    text_column: &str,
) -> Result<StageReport, TableError> {
    let df = read_table(interim)?;
    let mut redacted = redact_frame(df, text_column)?;

    let output_path = output_dir.join(file_name);
    write_table(&mut redacted, &output_path)?;
    info!(path = %output_path.display(), "Processed data saved");

    Ok(StageReport::new(&output_path, &redacted))
}
