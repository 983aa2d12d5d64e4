//! CSV to XLSX Converter Library
//!
//! Batch-converts the pipe-delimited CSV files found in a folder into
//! single-sheet XLSX spreadsheets, one spreadsheet per input file.
//!
//! This library provides tools for:
//! - Discovering `.csv` files in a source directory, newest first
//! - Parsing delimited text with no header row and a ragged-row policy
//! - Writing parsed tables to XLSX without header or index columns
//! - Per-file error isolation with a timed run summary
//!
//! ```no_run
//! let summary = csv_to_xlsx::run_batch("exports", "spreadsheets");
//! for result in &summary.results {
//!     println!("{}", result.status_line());
//! }
//! println!("{}", summary.summary_line());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;

// Re-export commonly used types
pub use config::{CellValueMode, ConverterConfig, RaggedRowPolicy};
pub use error::{ConvertError, Result};
pub use models::{
    ConversionResult, FailureKind, FailureReason, InputFile, Outcome, RunSummary, Table,
};
pub use processor::{BatchConverter, run_batch};
