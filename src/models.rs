//! Core data structures for CSV to XLSX conversion.
//!
//! Defines discovered input files, parsed tables, ragged-row records,
//! per-file conversion results and the run summary reported to callers.

use crate::constants::{CSV_SUFFIX, XLSX_EXTENSION};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Strip a case-insensitive `.csv` suffix from a file name
///
/// Returns `None` when the name does not end in `.csv`.
pub fn strip_csv_suffix(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(CSV_SUFFIX.len())?;
    if !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = file_name.split_at(split);
    suffix.eq_ignore_ascii_case(CSV_SUFFIX).then_some(stem)
}

/// Derive the output file name for an input file name
pub fn output_file_name(file_name: &str) -> String {
    let stem = strip_csv_suffix(file_name).unwrap_or(file_name);
    format!("{}.{}", stem, XLSX_EXTENSION)
}

/// A CSV file discovered in the source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: SystemTime,
    pub size_bytes: u64,
}

impl InputFile {
    /// Name of the spreadsheet this file converts into
    pub fn output_file_name(&self) -> String {
        output_file_name(&self.file_name)
    }

    /// Last-modified time in the local timezone, for listings
    pub fn modified_local(&self) -> DateTime<Local> {
        DateTime::<Local>::from(self.modified)
    }
}

/// Parsed rows of a single file, all rows treated as data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
    column_count: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; the first row establishes the column count
    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        if self.rows.is_empty() {
            self.column_count = row.len();
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count established by the first row (0 for an empty table)
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What the parser did with a ragged row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedAction {
    Skipped,
    Padded,
}

impl fmt::Display for RaggedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaggedAction::Skipped => write!(f, "skipped"),
            RaggedAction::Padded => write!(f, "padded"),
        }
    }
}

/// A row whose cell count disagreed with the established column count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaggedRow {
    /// 1-based line number on which the row starts
    pub line: u64,
    pub expected: usize,
    pub found: usize,
    pub action: RaggedAction,
}

impl fmt::Display for RaggedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: expected {} fields, saw {} ({})",
            self.line, self.expected, self.found, self.action
        )
    }
}

/// Parser output: the table plus any ragged rows encountered
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub table: Table,
    pub ragged_rows: Vec<RaggedRow>,
}

impl ParsedTable {
    /// Number of rows dropped from the table
    pub fn skipped_rows(&self) -> usize {
        self.ragged_rows
            .iter()
            .filter(|row| row.action == RaggedAction::Skipped)
            .count()
    }
}

/// Stage of the conversion at which a file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Read,
    Decode,
    Parse,
    Write,
}

/// Structured reason for a failed conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of converting a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        output_path: PathBuf,
        rows_written: usize,
        rows_skipped: usize,
    },
    Failure(FailureReason),
}

/// Result of converting one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    /// Name of the input file
    pub file_name: String,
    pub outcome: Outcome,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Name identifying the result: the written spreadsheet on success,
    /// the input file on failure
    pub fn display_name(&self) -> String {
        match &self.outcome {
            Outcome::Success { output_path, .. } => output_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| output_file_name(&self.file_name)),
            Outcome::Failure(_) => self.file_name.clone(),
        }
    }

    /// Human-readable status line for this file
    pub fn status_line(&self) -> String {
        match &self.outcome {
            Outcome::Success { .. } => format!("Done: {}", self.file_name),
            Outcome::Failure(reason) => {
                format!("Error processing {}: {}", self.file_name, reason.message)
            }
        }
    }
}

/// Results of one batch invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub results: Vec<ConversionResult>,
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Aggregate timing line with two decimal places
    pub fn summary_line(&self) -> String {
        format!("Script completed in {:.2} seconds.", self.elapsed_seconds())
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
