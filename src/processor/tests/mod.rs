//! Integration tests for the processor module
//!
//! Tests the complete conversion pipeline against temporary source and
//! output directories.


use calamine::{Data, Reader, Xlsx, open_workbook};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Write a source file and pin its modification time `age_secs` in the past
pub(crate) fn write_source(dir: &Path, name: &str, contents: &[u8], age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
}

/// Read the first worksheet of a workbook back as strings
pub(crate) fn read_cells(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}
