//! One unit of work: a detected file and its extraction lifecycle.

use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::ExtractOutcome;
use crate::ExtractionError;
use crate::sink::LogSink;

use super::extractor::Extractor;

/// A qualifying filesystem event for a non-directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEvent {
    /// The new file.
    pub source_path: PathBuf,
    /// When the notification was handled.
    pub detected_at: SystemTime,
}

impl ArchiveEvent {
    /// Event for `source_path`, detected now.
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            detected_at: SystemTime::now(),
        }
    }
}

/// Lifecycle of an [`ExtractionTask`].
///
/// `Pending -> Retrying* -> {Succeeded | Skipped | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Created, not started.
    Pending,
    /// At least one attempt hit a lock; waiting or trying again.
    Retrying,
    /// Archive extracted.
    Succeeded,
    /// Source vanished or was not an archive. Nothing logged.
    Skipped,
    /// Gave up; one failure line was logged.
    Failed,
}

impl TaskStatus {
    /// `true` for `Succeeded`, `Skipped` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Skipped | Self::Failed)
    }
}

/// Extraction of one detected file, owned by the worker running it.
#[derive(Debug)]
pub struct ExtractionTask {
    event: ArchiveEvent,
    destination_root: PathBuf,
    status: TaskStatus,
    attempts: u32,
}

impl ExtractionTask {
    /// Pending task extracting under `destination_root`.
    #[must_use]
    pub fn new(event: ArchiveEvent, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            event,
            destination_root: destination_root.into(),
            status: TaskStatus::Pending,
            attempts: 0,
        }
    }

    /// The event this task was created for.
    #[must_use]
    pub const fn event(&self) -> &ArchiveEvent {
        &self.event
    }

    /// Root the target directory is derived under.
    #[must_use]
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Attempts made so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Runs the task to a terminal status.
    ///
    /// Reports exactly one line to `sink` on success and exactly one on
    /// failure; vanished sources and unrecognized files end
    /// [`TaskStatus::Skipped`] without a line. The outcome is also returned
    /// for callers that want the details.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the task in [`TaskStatus::Failed`].
    pub fn run(
        &mut self,
        extractor: &Extractor,
        sink: &dyn LogSink,
    ) -> Result<ExtractOutcome, ExtractionError> {
        let source = self.event.source_path.clone();
        let status = &mut self.status;
        let attempts = &mut self.attempts;

        let result = extractor.extract_observed(&source, &self.destination_root, |attempt| {
            *attempts = attempt;
            if attempt > 1 {
                *status = TaskStatus::Retrying;
            }
        });

        match &result {
            Ok(ExtractOutcome::Extracted(info)) => {
                self.status = TaskStatus::Succeeded;
                sink.append(&success_line(&source, &info.target_dir));
            }
            Ok(ExtractOutcome::Skipped(reason)) => {
                self.status = TaskStatus::Skipped;
                tracing::debug!("[task] {} skipped: {reason:?}", source.display());
            }
            Err(e) => {
                self.status = TaskStatus::Failed;
                sink.append(&failure_line(&source, e));
            }
        }
        result
    }
}

fn success_line(source: &Path, target_dir: &Path) -> String {
    let group = source
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    format!("Extracted {group} into {}", target_dir.display())
}

fn failure_line(source: &Path, err: &ExtractionError) -> String {
    match err {
        ExtractionError::RetriesExhausted { attempts, .. } => {
            format!("Extraction failed after {attempts} retries. File may still be locked.")
        }
        other => format!("Extraction of {} failed: {other}", source.display()),
    }
}
