//! Extraction outcome reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::ArchiveKind;

/// Summary of one successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractedInfo {
    /// Format the archive was extracted as.
    pub kind: ArchiveKind,

    /// Directory the contents were written to.
    pub target_dir: PathBuf,

    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Entries deliberately not extracted (links, devices).
    pub entries_skipped: usize,

    /// Attempts used, including the successful one.
    pub attempts: u32,

    /// Duration of the successful attempt.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractedInfo {
    /// Creates an empty summary for an extraction into `target_dir`.
    #[must_use]
    pub fn new(kind: ArchiveKind, target_dir: PathBuf) -> Self {
        Self {
            kind,
            target_dir,
            files_extracted: 0,
            directories_created: 0,
            bytes_written: 0,
            entries_skipped: 0,
            attempts: 1,
            duration: Duration::ZERO,
            warnings: Vec::new(),
        }
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns total number of items written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

/// Why a task ended without extracting and without reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file disappeared before it could be opened.
    VanishedSource,
    /// The file is not (yet) a supported archive.
    UnrecognizedFormat,
}

/// Result of one extraction task that did not fail.
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    /// The archive was unpacked.
    Extracted(ExtractedInfo),
    /// Nothing was done, silently.
    Skipped(SkipReason),
}

impl ExtractOutcome {
    /// Returns the extraction summary, if anything was extracted.
    #[must_use]
    pub const fn extracted(&self) -> Option<&ExtractedInfo> {
        match self {
            Self::Extracted(info) => Some(info),
            Self::Skipped(_) => None,
        }
    }
}
