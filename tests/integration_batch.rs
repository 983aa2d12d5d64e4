//! End-to-end tests for batch conversion through the public API
//!
//! Each test builds a throwaway source folder, runs a batch and reads the
//! produced workbooks back with calamine.

use calamine::{Data, Reader, Xlsx, open_workbook};
use csv_to_xlsx::{
    BatchConverter, ConverterConfig, FailureKind, Outcome, RaggedRowPolicy, run_batch,
};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn write_aged(dir: &Path, name: &str, contents: &[u8], age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
}

fn sheet_strings(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let sheets = workbook.sheet_names();
    assert_eq!(sheets.len(), 1, "expected a single worksheet");
    let range = workbook.worksheet_range(&sheets[0]).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_mixed_folder_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("exports");
    let output = temp_dir.path().join("sheets");
    fs::create_dir_all(&source).unwrap();

    write_aged(&source, "a.csv", b"k1|v1\nk2|v2\n", 60);
    write_aged(&source, "b.csv", b"x|y\nz|w\n", 600);
    write_aged(&source, "c.csv", b"\x80\x81|bad\n", 6);
    write_aged(&source, "ignore.txt", b"1|2\n", 1);

    let summary = run_batch(&source, &output);

    let names: Vec<String> = summary.results.iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["c.csv", "a.xlsx", "b.xlsx"]);

    match &summary.results[0].outcome {
        Outcome::Failure(reason) => assert_eq!(reason.kind, FailureKind::Decode),
        other => panic!("Expected decode failure, got {:?}", other),
    }
    assert!(!output.join("c.xlsx").exists());
    assert!(!output.join("ignore.xlsx").exists());

    assert_eq!(
        sheet_strings(&output.join("a.xlsx")),
        vec![vec!["k1", "v1"], vec!["k2", "v2"]]
    );
    assert_eq!(
        sheet_strings(&output.join("b.xlsx")),
        vec![vec!["x", "y"], vec!["z", "w"]]
    );

    let lines: Vec<String> = summary.results.iter().map(|r| r.status_line()).collect();
    assert!(lines[0].starts_with("Error processing c.csv: "));
    assert_eq!(lines[1], "Done: a.csv");
    assert_eq!(lines[2], "Done: b.csv");
    assert!(summary.summary_line().starts_with("Script completed in "));
    assert!(summary.summary_line().ends_with(" seconds."));
}

#[test]
fn test_quoted_multiline_cell_survives() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_aged(dir, "notes.csv", b"id|note\n1|\"first line\nsecond | line\"\n", 1);

    let summary = run_batch(dir, dir.join("out"));

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(
        sheet_strings(&dir.join("out").join("notes.xlsx")),
        vec![
            vec!["id", "note"],
            vec!["1", "first line\nsecond | line"]
        ]
    );
}

#[test]
fn test_configured_converter_reports_json() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("in");
    fs::create_dir_all(&source).unwrap();
    write_aged(&source, "ragged.csv", b"a|b\nc\nd|e|f\ng|h\n", 1);

    let config = ConverterConfig::new(&source, temp_dir.path().join("out"))
        .with_ragged_rows(RaggedRowPolicy::Pad);
    let summary = BatchConverter::new(config).unwrap().run().unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    let outcome = &json["results"][0]["outcome"];
    assert_eq!(outcome["status"], "success");
    assert_eq!(outcome["rows_written"], 3);
    assert_eq!(outcome["rows_skipped"], 1);
    assert!(json["elapsed_seconds"].as_f64().unwrap() >= 0.0);
}
