//! Error handling for CSV to XLSX conversion.
//!
//! Provides error types with context for directory scanning, file decoding,
//! table parsing and spreadsheet writing failures.

use crate::models::FailureKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{file}' is not valid UTF-8: invalid byte sequence at offset {offset}")]
    Decode {
        file: String,
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("CSV parsing error in file '{file}': {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write spreadsheet {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error(
        "Table of {rows} rows x {columns} columns exceeds the XLSX sheet limit of {max_rows} rows x {max_columns} columns"
    )]
    SheetLimit {
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },

    #[error("Directory traversal failed in {path}: {source}")]
    DirectoryTraversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ConvertError {
    /// Create a decode error from the UTF-8 validation failure of a file
    pub fn decode(file: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::Decode {
            file: file.into(),
            offset: source.valid_up_to(),
            source,
        }
    }

    /// Create a missing input error
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classify a per-file error into the stage that produced it
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Decode { .. } => FailureKind::Decode,
            Self::Csv { .. } => FailureKind::Parse,
            Self::Write { .. } | Self::SheetLimit { .. } => FailureKind::Write,
            Self::Io(_)
            | Self::Read { .. }
            | Self::DirectoryTraversal { .. }
            | Self::MissingInput { .. }
            | Self::Configuration { .. } => FailureKind::Read,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
