//! Batch conversion engine.
//!
//! Orchestrates the conversion workflow: discovery of input files,
//! parsing each file into a table and writing it out as a spreadsheet.
//! Files are converted one at a time in discovery order and a failure in
//! one file never stops the rest of the batch.

pub mod discovery;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, reader::TableReader, writer::XlsxWriter};

use crate::config::ConverterConfig;
use crate::error::Result;
use crate::models::{ConversionResult, FailureReason, InputFile, Outcome, RunSummary};

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Converter for every CSV file in a source directory
#[derive(Debug)]
pub struct BatchConverter {
    config: ConverterConfig,
    file_discovery: FileDiscovery,
    table_reader: TableReader,
    xlsx_writer: XlsxWriter,
}

impl BatchConverter {
    /// Create a converter, validating the configuration first
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            file_discovery: FileDiscovery::new(config.source_dir.clone()),
            table_reader: TableReader::new(&config),
            xlsx_writer: XlsxWriter::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// List the files a run would convert, newest first
    pub fn discover(&self) -> Result<Vec<InputFile>> {
        self.file_discovery.discover_csv_files()
    }

    /// Discover and convert every file in the source directory
    pub fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let files = self.discover()?;
        let mut summary = self.convert_files(&files);
        summary.elapsed = start_time.elapsed();
        Ok(summary)
    }

    /// Convert the given files in order, one result per file
    pub fn convert_files(&self, files: &[InputFile]) -> RunSummary {
        let start_time = Instant::now();

        if files.is_empty() {
            warn!("No CSV files found in {}", self.config.source_dir.display());
            return RunSummary {
                results: Vec::new(),
                elapsed: start_time.elapsed(),
            };
        }

        info!(
            "Converting {} files from {} to {}",
            files.len(),
            self.config.source_dir.display(),
            self.config.output_dir.display()
        );
        self.prepare_output_dir();

        let pb = self.progress_bar(files.len());
        let mut results = Vec::with_capacity(files.len());

        for input in files {
            pb.set_message(input.file_name.clone());
            let result = self.convert_file(input);
            match &result.outcome {
                Outcome::Success { rows_written, .. } => {
                    debug!("Converted {} ({} rows)", input.file_name, rows_written);
                }
                Outcome::Failure(reason) => {
                    warn!("Failed to convert {}: {}", input.file_name, reason.message);
                }
            }
            results.push(result);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let summary = RunSummary {
            results,
            elapsed: start_time.elapsed(),
        };
        info!(
            "Batch finished: {} converted, {} failed in {:.2}s",
            summary.succeeded(),
            summary.failed(),
            summary.elapsed_seconds()
        );
        summary
    }

    /// Convert a single file, capturing any failure in the result
    pub fn convert_file(&self, input: &InputFile) -> ConversionResult {
        let output_path = self.output_path_for(input);
        let outcome = match self.try_convert(input, &output_path) {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Failure(FailureReason {
                kind: err.failure_kind(),
                message: err.to_string(),
            }),
        };

        ConversionResult {
            file_name: input.file_name.clone(),
            outcome,
        }
    }

    /// Path the spreadsheet for `input` is written to
    pub fn output_path_for(&self, input: &InputFile) -> PathBuf {
        self.config.output_dir.join(input.output_file_name())
    }

    fn try_convert(&self, input: &InputFile, output_path: &Path) -> Result<Outcome> {
        let parsed = self.table_reader.read_file(&input.path)?;
        let rows_written = self.xlsx_writer.write_table(&parsed.table, output_path)?;

        Ok(Outcome::Success {
            output_path: output_path.to_path_buf(),
            rows_written,
            rows_skipped: parsed.skipped_rows(),
        })
    }

    fn prepare_output_dir(&self) {
        let output_dir = &self.config.output_dir;
        if output_dir.is_dir() {
            return;
        }
        // Per-file writes report the failure if this does not succeed
        if let Err(err) = fs::create_dir_all(output_dir) {
            warn!(
                "Could not create output directory {}: {}",
                output_dir.display(),
                err
            );
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(err) => debug!("Falling back to default progress style: {}", err),
        }
        pb
    }
}

/// Convert every CSV file in `source_dir` into `output_dir` with default settings
///
/// Never fails: configuration problems are reported as an empty summary
/// with a logged error, and per-file failures are recorded in the results.
pub fn run_batch(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> RunSummary {
    let start_time = Instant::now();
    let config = ConverterConfig::new(source_dir, output_dir);

    let outcome = BatchConverter::new(config).and_then(|converter| converter.run());
    match outcome {
        Ok(summary) => summary,
        Err(err) => {
            error!("Batch did not start: {}", err);
            RunSummary {
                results: Vec::new(),
                elapsed: start_time.elapsed(),
            }
        }
    }
}
