//! Table reading module for delimited text files
//!
//! Decodes a file as UTF-8, splits it into records and cells, and applies
//! the configured ragged-row policy. The first record establishes the
//! column count; every record, including the first, is data.

use crate::config::{ConverterConfig, RaggedRowPolicy};
use crate::error::{ConvertError, Result};
use crate::models::{ParsedTable, RaggedAction, RaggedRow};

use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

/// Reader turning delimited text into a [`ParsedTable`]
#[derive(Debug, Clone)]
pub struct TableReader {
    delimiter: u8,
    quoting: bool,
    ragged_rows: RaggedRowPolicy,
}

impl TableReader {
    /// Create a reader from the converter configuration
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            quoting: config.quoting,
            ragged_rows: config.ragged_rows,
        }
    }

    /// Read and parse a file from disk
    pub fn read_file(&self, path: &Path) -> Result<ParsedTable> {
        let bytes = std::fs::read(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_bytes(&file_name, &bytes)
    }

    /// Decode raw file contents as UTF-8 and parse them
    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedTable> {
        let text =
            std::str::from_utf8(bytes).map_err(|source| ConvertError::decode(file_name, source))?;
        self.parse_str(file_name, text)
    }

    /// Parse already-decoded text
    pub fn parse_str(&self, file_name: &str, text: &str) -> Result<ParsedTable> {
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quoting(self.quoting)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut parsed = ParsedTable::default();
        let mut record = StringRecord::new();

        while reader
            .read_record(&mut record)
            .map_err(|source| ConvertError::Csv {
                file: file_name.to_string(),
                source,
            })?
        {
            let cells: Vec<String> = record.iter().map(str::to_string).collect();

            if parsed.table.is_empty() {
                parsed.table.push_row(cells);
                continue;
            }

            let expected = parsed.table.column_count();
            let found = cells.len();
            if found == expected {
                parsed.table.push_row(cells);
                continue;
            }

            let line = record.position().map_or(0, |pos| pos.line());
            let action = match self.ragged_rows {
                RaggedRowPolicy::Pad if found < expected => {
                    let mut padded = cells;
                    padded.resize(expected, String::new());
                    parsed.table.push_row(padded);
                    RaggedAction::Padded
                }
                _ => RaggedAction::Skipped,
            };

            let ragged = RaggedRow {
                line,
                expected,
                found,
                action,
            };
            warn!("{}: {}", file_name, ragged);
            parsed.ragged_rows.push(ragged);
        }

        debug!(
            "Parsed {}: {} rows x {} columns, {} ragged rows",
            file_name,
            parsed.table.row_count(),
            parsed.table.column_count(),
            parsed.ragged_rows.len()
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn reader() -> TableReader {
        TableReader::new(&ConverterConfig::default())
    }

    fn rows(parsed: &ParsedTable) -> Vec<Vec<&str>> {
        parsed
            .table
            .rows()
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_parse_pipe_delimited_without_header() {
        let parsed = reader().parse_str("t.csv", "id|name\n1|alpha\n2|beta\n").unwrap();

        assert_eq!(parsed.table.row_count(), 3);
        assert_eq!(parsed.table.column_count(), 2);
        assert_eq!(
            rows(&parsed),
            vec![vec!["id", "name"], vec!["1", "alpha"], vec!["2", "beta"]]
        );
        assert!(parsed.ragged_rows.is_empty());
    }

    #[test]
    fn test_commas_are_not_delimiters() {
        let parsed = reader().parse_str("t.csv", "a,b|c\n").unwrap();
        assert_eq!(rows(&parsed), vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_crlf_blank_lines_and_missing_trailing_newline() {
        let parsed = reader().parse_str("t.csv", "a|b\r\n\r\nc|d\r\ne|f").unwrap();
        assert_eq!(
            rows(&parsed),
            vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]
        );
    }

    #[test]
    fn test_empty_cells_preserved() {
        let parsed = reader().parse_str("t.csv", "a||c\n|b|\n").unwrap();
        assert_eq!(rows(&parsed), vec![vec!["a", "", "c"], vec!["", "b", ""]]);
        assert_eq!(parsed.table.column_count(), 3);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let parsed = reader().parse_str("t.csv", "\u{feff}x|y\n").unwrap();
        assert_eq!(rows(&parsed), vec![vec!["x", "y"]]);
    }

    #[test]
    fn test_quoted_fields_may_contain_delimiter() {
        let parsed = reader().parse_str("t.csv", "\"a|b\"|c\n").unwrap();
        assert_eq!(rows(&parsed), vec![vec!["a|b", "c"]]);
    }

    #[test]
    fn test_quoting_disabled_splits_every_delimiter() {
        let config = ConverterConfig::default().without_quoting();
        let parsed = TableReader::new(&config)
            .parse_str("t.csv", "\"a|b\"|c\n")
            .unwrap();
        assert_eq!(rows(&parsed), vec![vec!["\"a", "b\"", "c"]]);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = ConverterConfig::default().with_delimiter(b';');
        let parsed = TableReader::new(&config)
            .parse_str("t.csv", "a;b|c\n")
            .unwrap();
        assert_eq!(rows(&parsed), vec![vec!["a", "b|c"]]);
    }

    #[test]
    fn test_ragged_row_skipped_with_warning() {
        let text = "a|b|c\nd|e|f\ng|h\ni|j|k\n";
        let parsed = reader().parse_str("t.csv", text).unwrap();

        assert_eq!(parsed.table.row_count(), 3);
        assert_eq!(
            rows(&parsed),
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"], vec!["i", "j", "k"]]
        );
        assert_eq!(
            parsed.ragged_rows,
            vec![RaggedRow {
                line: 3,
                expected: 3,
                found: 2,
                action: RaggedAction::Skipped,
            }]
        );
        assert_eq!(parsed.skipped_rows(), 1);
    }

    #[test]
    fn test_long_rows_skipped_under_both_policies() {
        for policy in [RaggedRowPolicy::Skip, RaggedRowPolicy::Pad] {
            let config = ConverterConfig::default().with_ragged_rows(policy);
            let parsed = TableReader::new(&config)
                .parse_str("t.csv", "a|b\nc|d|e\nf|g\n")
                .unwrap();
            assert_eq!(parsed.table.row_count(), 2);
            assert_eq!(parsed.ragged_rows[0].action, RaggedAction::Skipped);
            assert_eq!(parsed.ragged_rows[0].found, 3);
        }
    }

    #[test]
    fn test_pad_policy_fills_short_rows() {
        let config = ConverterConfig::default().with_ragged_rows(RaggedRowPolicy::Pad);
        let parsed = TableReader::new(&config)
            .parse_str("t.csv", "a|b|c\nd\n")
            .unwrap();

        assert_eq!(rows(&parsed), vec![vec!["a", "b", "c"], vec!["d", "", ""]]);
        assert_eq!(parsed.ragged_rows[0].action, RaggedAction::Padded);
        assert_eq!(parsed.skipped_rows(), 0);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let parsed = reader().parse_str("t.csv", "").unwrap();
        assert!(parsed.table.is_empty());
        assert_eq!(parsed.table.column_count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let result = reader().parse_bytes("c.csv", b"a|b\n\xff\xfe|c\n");
        match result {
            Err(ConvertError::Decode { file, offset, .. }) => {
                assert_eq!(file, "c.csv");
                assert_eq!(offset, 4);
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_file_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.csv");
        fs::write(&path, "1|2\n3|4\n").unwrap();

        let parsed = reader().read_file(&path).unwrap();
        assert_eq!(rows(&parsed), vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_read_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.csv");

        match reader().read_file(&path) {
            Err(ConvertError::Read { path: err_path, .. }) => assert_eq!(err_path, path),
            other => panic!("Expected Read error, got {:?}", other),
        }
    }
}
