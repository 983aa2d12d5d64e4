//! Configuration management and validation.
//!
//! Provides the converter configuration: source and output directories,
//! parser settings, ragged-row policy and spreadsheet output settings.
//! Directories are always explicit; nothing here reads the process
//! working directory or environment.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_SHEET_NAME, QUOTE_CHAR, XLSX_INVALID_SHEET_NAME_CHARS,
    XLSX_MAX_SHEET_NAME_LEN,
};
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How rows with a mismatched cell count are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RaggedRowPolicy {
    /// Drop every row whose cell count differs from the first row
    #[default]
    Skip,
    /// Pad short rows with empty cells, drop long rows
    Pad,
}

/// How cell text is stored in the spreadsheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CellValueMode {
    /// Write every cell as a string, exactly as parsed
    #[default]
    Text,
    /// Write cells that parse as finite numbers as numeric cells
    InferNumbers,
}

/// Global configuration for a conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Directory scanned for input files (not recursive)
    pub source_dir: PathBuf,

    /// Directory receiving the converted spreadsheets
    pub output_dir: PathBuf,

    /// Column delimiter byte
    pub delimiter: u8,

    /// Honour double-quoted fields
    pub quoting: bool,

    /// Ragged-row handling
    pub ragged_rows: RaggedRowPolicy,

    /// Cell typing in the output
    pub cell_values: CellValueMode,

    /// Name of the single worksheet
    pub sheet_name: String,

    /// Render a progress bar while converting
    pub show_progress: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            delimiter: DEFAULT_DELIMITER,
            quoting: true,
            ragged_rows: RaggedRowPolicy::default(),
            cell_values: CellValueMode::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            show_progress: false,
        }
    }
}

impl ConverterConfig {
    /// Create configuration for the given source and output directories
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Create configuration with directories resolved against a base directory
    ///
    /// Unset or empty directories default to `base_dir`; relative ones are
    /// joined onto it.
    pub fn from_base_dir(base_dir: &Path, source: Option<&Path>, output: Option<&Path>) -> Self {
        Self::new(resolve_dir(base_dir, source), resolve_dir(base_dir, output))
    }

    /// Set the column delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat quote characters as ordinary text
    pub fn without_quoting(mut self) -> Self {
        self.quoting = false;
        self
    }

    /// Set the ragged-row policy
    pub fn with_ragged_rows(mut self, policy: RaggedRowPolicy) -> Self {
        self.ragged_rows = policy;
        self
    }

    /// Set how cell values are typed
    pub fn with_cell_values(mut self, mode: CellValueMode) -> Self {
        self.cell_values = mode;
        self
    }

    /// Set the worksheet name
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Enable the progress bar
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Check that a batch can start with this configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConvertError::missing_input(
                "Please provide both CSV folder and output folder paths (CSV folder is empty)",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConvertError::missing_input(
                "Please provide both CSV folder and output folder paths (output folder is empty)",
            ));
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'\n' | b'\r') {
            return Err(ConvertError::configuration(format!(
                "delimiter must be a single ASCII character other than a line break, got byte 0x{:02x}",
                self.delimiter
            )));
        }
        if self.quoting && self.delimiter == QUOTE_CHAR {
            return Err(ConvertError::configuration(
                "delimiter cannot be the quote character while quoting is enabled",
            ));
        }

        validate_sheet_name(&self.sheet_name)?;

        debug!(
            "Configuration validated: source={}, output={}",
            self.source_dir.display(),
            self.output_dir.display()
        );
        Ok(())
    }
}

/// Resolve an optional user-supplied directory against a base directory
pub fn resolve_dir(base_dir: &Path, dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => base_dir.join(dir),
        _ => base_dir.to_path_buf(),
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConvertError::configuration("sheet name cannot be empty"));
    }
    if name.chars().count() > XLSX_MAX_SHEET_NAME_LEN {
        return Err(ConvertError::configuration(format!(
            "sheet name '{}' is longer than {} characters",
            name, XLSX_MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(bad) = name.chars().find(|c| XLSX_INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(ConvertError::configuration(format!(
            "sheet name '{}' contains invalid character '{}'",
            name, bad
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(ConvertError::configuration(format!(
            "sheet name '{}' cannot start or end with an apostrophe",
            name
        )));
    }
    Ok(())
}
