//! Extraction operation reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// How an extraction call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionOutcome {
    /// Every entry was visited.
    #[default]
    Completed,

    /// The error handler chose `Abort`; remaining entries were not visited.
    Aborted,
}

/// Report of an archive extraction operation.
///
/// Contains statistics and metadata about the extraction process.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files successfully extracted.
    pub files_extracted: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Entries rejected by the entry filter.
    pub entries_filtered: usize,

    /// Entries consumed entirely by strip-components.
    pub entries_stripped: usize,

    /// Entries left alone because the destination already existed and
    /// overwriting was disabled.
    pub entries_existing: usize,

    /// Entries abandoned after a failure.
    pub entries_skipped: usize,

    /// Number of retried attempts.
    pub retries: usize,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,

    /// Destination paths materialized by this call, in order, without
    /// duplicates.
    pub extracted_paths: Vec<PathBuf>,

    /// Duration of the extraction operation.
    pub duration: Duration,

    /// Whether the call ran to the end or was aborted.
    pub outcome: ExtractionOutcome,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns total number of items materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created + self.symlinks_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns `true` if the error handler aborted the call.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.outcome == ExtractionOutcome::Aborted
    }

    /// Returns `true` if `path` was materialized by this call.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.extracted_paths.iter().any(|p| p == path)
    }
}
