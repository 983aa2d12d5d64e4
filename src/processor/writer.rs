//! XLSX writing module
//!
//! Serializes a parsed table into a single-sheet workbook. No header row
//! and no index column are added; cells land at the row and column they
//! were parsed from.

use crate::config::{CellValueMode, ConverterConfig};
use crate::constants::{XLSX_MAX_COLUMNS, XLSX_MAX_ROWS};
use crate::error::{ConvertError, Result};
use crate::models::Table;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

/// Spreadsheet writer for parsed tables
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
    cell_values: CellValueMode,
}

impl XlsxWriter {
    /// Create a writer from the converter configuration
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            cell_values: config.cell_values,
        }
    }

    /// Write `table` to `output_path`, replacing any existing file
    ///
    /// Returns the number of rows written.
    pub fn write_table(&self, table: &Table, output_path: &Path) -> Result<usize> {
        check_sheet_limits(table)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.fill_worksheet(worksheet, table)
            .map_err(|source| ConvertError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;

        workbook
            .save(output_path)
            .map_err(|source| ConvertError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;

        debug!(
            "Wrote {} rows x {} columns to {}",
            table.row_count(),
            table.column_count(),
            output_path.display()
        );

        Ok(table.row_count())
    }

    fn fill_worksheet(
        &self,
        worksheet: &mut Worksheet,
        table: &Table,
    ) -> std::result::Result<(), XlsxError> {
        worksheet.set_name(&self.sheet_name)?;

        for (row_index, row) in table.rows().iter().enumerate() {
            for (col_index, cell) in row.iter().enumerate() {
                // Empty cells stay blank
                if cell.is_empty() {
                    continue;
                }

                let (row_num, col_num) = (row_index as u32, col_index as u16);
                match self.cell_values {
                    CellValueMode::InferNumbers => match parse_number(cell) {
                        Some(number) => worksheet.write_number(row_num, col_num, number)?,
                        None => worksheet.write_string(row_num, col_num, cell)?,
                    },
                    CellValueMode::Text => worksheet.write_string(row_num, col_num, cell)?,
                };
            }
        }

        Ok(())
    }
}

fn check_sheet_limits(table: &Table) -> Result<()> {
    if table.row_count() > XLSX_MAX_ROWS || table.column_count() > XLSX_MAX_COLUMNS {
        return Err(ConvertError::SheetLimit {
            rows: table.row_count(),
            columns: table.column_count(),
            max_rows: XLSX_MAX_ROWS,
            max_columns: XLSX_MAX_COLUMNS,
        });
    }
    Ok(())
}

/// Parse a cell as a finite number
fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
