//! Command-line interface components.
//!
//! Argument parsing, logging setup and report rendering for the
//! `csv-to-xlsx` binary. The conversion itself lives in [`crate::processor`].

use crate::config::{CellValueMode, ConverterConfig, RaggedRowPolicy};
use crate::constants::{LOG_TARGET, NO_FILES_MESSAGE};
use crate::models::{InputFile, Outcome, RunSummary};
use crate::processor::BatchConverter;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "csv-to-xlsx")]
#[command(about = "Convert every pipe-delimited CSV file in a folder into an XLSX spreadsheet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// CSV folder, relative to the working directory (defaults to the working directory)
    #[arg(value_name = "CSV_FOLDER")]
    pub source: Option<PathBuf>,

    /// Output folder, relative to the working directory (defaults to the working directory)
    #[arg(short, long, value_name = "OUTPUT_FOLDER")]
    pub output: Option<PathBuf>,

    /// Column delimiter (a single ASCII character)
    #[arg(short, long, default_value = "|", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Treat double quotes as ordinary characters
    #[arg(long)]
    pub no_quoting: bool,

    /// How to handle rows whose cell count differs from the first row
    #[arg(long, value_enum, default_value = "skip")]
    pub ragged: RaggedRowPolicy,

    /// Write cells that look like numbers as numeric cells
    #[arg(long)]
    pub infer_numbers: bool,

    /// Worksheet name
    #[arg(long, default_value = crate::constants::DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// List the files that would be converted and exit
    #[arg(long)]
    pub list_only: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Args {
    /// Get the log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human
    }

    /// Build the converter configuration, resolving folders against `base_dir`
    pub fn to_config(&self, base_dir: &Path) -> ConverterConfig {
        let mut config =
            ConverterConfig::from_base_dir(base_dir, self.source.as_deref(), self.output.as_deref())
                .with_delimiter(self.delimiter)
                .with_ragged_rows(self.ragged)
                .with_sheet_name(self.sheet_name.clone());

        if self.no_quoting {
            config = config.without_quoting();
        }
        if self.infer_numbers {
            config = config.with_cell_values(CellValueMode::InferNumbers);
        }
        if self.show_progress() {
            config = config.with_progress();
        }
        config
    }
}

fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    let value = if value == "\\t" { "\t" } else { value };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "delimiter must be exactly one ASCII character, got '{}'",
            value
        )),
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the command described by `args` against `base_dir`
///
/// Returns the run summary; per-file failures are part of the summary,
/// only a batch that cannot start is an error.
pub fn run(args: &Args, base_dir: &Path) -> Result<RunSummary> {
    let start_time = Instant::now();
    let config = args.to_config(base_dir);
    let converter = BatchConverter::new(config).context("Cannot start conversion")?;

    let files = converter
        .discover()
        .context("Failed to list the CSV folder")?;

    if args.format == OutputFormat::Human {
        print_file_list(&files);
    }

    if args.list_only {
        if args.format == OutputFormat::Json {
            print_json(&files)?;
        }
        return Ok(RunSummary::default());
    }

    let mut summary = converter.convert_files(&files);
    summary.elapsed = start_time.elapsed();

    match args.format {
        OutputFormat::Human => print_human_report(&summary),
        OutputFormat::Json => print_json(&summary)?,
    }

    Ok(summary)
}

/// Working directory the CLI resolves relative folders against
pub fn working_directory() -> Result<PathBuf> {
    std::env::current_dir().context(
        "Please provide both CSV folder and output folder paths (working directory unavailable)",
    )
}

/// Print the discovered files, newest first
pub fn print_file_list(files: &[InputFile]) {
    if files.is_empty() {
        println!("{}", NO_FILES_MESSAGE.bright_yellow());
        return;
    }

    println!("{}", "Files to process:".bright_green().bold());
    for file in files {
        println!(
            "  - {} {}",
            file.file_name.bright_cyan(),
            format!(
                "({}, {})",
                file.modified_local().format("%Y-%m-%d %H:%M:%S"),
                format_size(file.size_bytes)
            )
            .bright_black()
        );
    }
}

/// Print one status line per file and the timing line
pub fn print_human_report(summary: &RunSummary) {
    if summary.results.is_empty() {
        println!("{}", NO_FILES_MESSAGE.bright_yellow());
    } else {
        println!();
        for result in &summary.results {
            match &result.outcome {
                Outcome::Success { rows_skipped, .. } => {
                    let line = format!("{} ✅", result.status_line());
                    if *rows_skipped > 0 {
                        println!(
                            "{} {}",
                            line.bright_green(),
                            format!("({} malformed rows skipped)", rows_skipped).bright_yellow()
                        );
                    } else {
                        println!("{}", line.bright_green());
                    }
                }
                Outcome::Failure(_) => println!("{}", result.status_line().bright_red()),
            }
        }
    }

    println!("{}", summary.summary_line().bright_white().bold());
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Format a byte count in human-readable units
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
