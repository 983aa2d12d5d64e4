//! Application constants for the CSV to XLSX converter
//!
//! File naming conventions, parser defaults, XLSX sheet limits and the
//! user-facing messages shared by the library and the CLI.

// =============================================================================
// File Naming
// =============================================================================

/// Suffix identifying input files (compared case-insensitively)
pub const CSV_SUFFIX: &str = ".csv";

/// Extension given to converted output files
pub const XLSX_EXTENSION: &str = "xlsx";

// =============================================================================
// Parser Defaults
// =============================================================================

/// Default column delimiter for input files
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Quote character honoured when quoting is enabled
pub const QUOTE_CHAR: u8 = b'"';

// =============================================================================
// Spreadsheet Limits
// =============================================================================

/// Default worksheet name, matching what spreadsheet tools create
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Maximum rows in a single XLSX worksheet
pub const XLSX_MAX_ROWS: usize = 1_048_576;

/// Maximum columns in a single XLSX worksheet
pub const XLSX_MAX_COLUMNS: usize = 16_384;

/// Maximum worksheet name length accepted by spreadsheet applications
pub const XLSX_MAX_SHEET_NAME_LEN: usize = 31;

/// Characters not allowed in a worksheet name
pub const XLSX_INVALID_SHEET_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

// =============================================================================
// Messages
// =============================================================================

/// Shown when a scan finds nothing to convert
pub const NO_FILES_MESSAGE: &str = "No CSV files found in the specified folder.";

/// Log target used to build the default tracing filter
pub const LOG_TARGET: &str = "csv_to_xlsx";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_limits_match_xlsx_format() {
        assert_eq!(XLSX_MAX_ROWS, 1 << 20);
        assert_eq!(XLSX_MAX_COLUMNS, 1 << 14);
        assert!(DEFAULT_SHEET_NAME.len() <= XLSX_MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_default_delimiter_is_pipe() {
        assert_eq!(DEFAULT_DELIMITER as char, '|');
    }
}
