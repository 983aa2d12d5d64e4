//! File discovery module for CSV source directories
//!
//! Lists the `.csv` files (case-insensitive) sitting directly inside a
//! source directory and orders them newest-modified first. A missing
//! source directory yields an empty listing, not an error.

use crate::error::{ConvertError, Result};
use crate::models::{InputFile, strip_csv_suffix};
use std::cmp::Reverse;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File discovery component for a single source directory
#[derive(Debug)]
pub struct FileDiscovery {
    source_dir: PathBuf,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Discover all CSV files directly inside the source directory
    ///
    /// Files are sorted by modification time, newest first; equal
    /// timestamps fall back to ascending file name.
    pub fn discover_csv_files(&self) -> Result<Vec<InputFile>> {
        if !self.source_dir.is_dir() {
            warn!(
                "Source directory {} does not exist; no files to convert",
                self.source_dir.display()
            );
            return Ok(Vec::new());
        }

        debug!("Searching for CSV files in: {}", self.source_dir.display());

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Failing to open the directory itself aborts the scan
                Err(err) if err.depth() == 0 => {
                    return Err(ConvertError::DirectoryTraversal {
                        path: self.source_dir.clone(),
                        source: err,
                    });
                }
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                warn!(
                    "Skipping file with non UTF-8 name: {}",
                    entry.path().display()
                );
                continue;
            };
            if strip_csv_suffix(file_name).is_none() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!("Skipping {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            files.push(InputFile {
                path: entry.path().to_path_buf(),
                file_name: file_name.to_string(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                size_bytes: metadata.len(),
            });
        }

        sort_newest_first(&mut files);

        debug!(
            "Found {} CSV files in {}",
            files.len(),
            self.source_dir.display()
        );

        Ok(files)
    }
}

/// Order files by modification time descending, then name ascending
pub fn sort_newest_first(files: &mut [InputFile]) {
    files.sort_by(|a, b| {
        Reverse(a.modified)
            .cmp(&Reverse(b.modified))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}
