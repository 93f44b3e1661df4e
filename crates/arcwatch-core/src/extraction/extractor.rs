//! Classify-then-extract for a single archive, with lock retries.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

use crate::ArchiveKind;
use crate::ExtractOutcome;
use crate::ExtractionError;
use crate::Result;
use crate::RetryPolicy;
use crate::SkipReason;
use crate::formats::detect::try_classify_reader;
use crate::formats::open_handler;
use crate::types::TargetDir;

use super::retry::retry_on_lock;
use super::source::SourceReader;
use super::source::TrackedSource;

/// Opens source files for extraction.
///
/// Lock and not-found errors drive the retry loop, whether they come from
/// `open` or from later reads of the returned source, so implementations
/// should return the raw [`io::Error`].
pub trait SourceOpener: Send + Sync {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn open(&self, path: &Path) -> io::Result<Box<dyn SourceReader>>;
}

/// Opens files straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOpener;

impl SourceOpener for FsOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn SourceReader>> {
        Ok(Box::new(File::open(path)?))
    }
}

/// Extracts archives into per-release target directories.
///
/// # Examples
///
/// ```no_run
/// use arcwatch_core::Extractor;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = Extractor::new();
/// let outcome = extractor.extract(
///     Path::new("/downloads/ReleaseA/game.zip"),
///     Path::new("/installs"),
/// )?;
/// if let Some(info) = outcome.extracted() {
///     println!("{} files into {}", info.files_extracted, info.target_dir.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Extractor {
    opener: Box<dyn SourceOpener>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Filesystem opener, default retry policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            opener: Box::new(FsOpener),
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces how source files are opened.
    #[must_use]
    pub fn with_opener(mut self, opener: impl SourceOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    /// Retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Extracts `source` into `dest_root/<parent folder of source>`,
    /// retrying while the source is locked.
    ///
    /// A missing source or an unrecognized format is not an error: both
    /// return [`ExtractOutcome::Skipped`] and write nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::RetriesExhausted`] when the source stays
    /// locked for the whole retry budget, or any other extraction error.
    pub fn extract(&self, source: &Path, dest_root: &Path) -> Result<ExtractOutcome> {
        self.extract_observed(source, dest_root, |_| {})
    }

    /// Same as [`Extractor::extract`], calling `on_attempt` with the attempt
    /// number before each try.
    ///
    /// # Errors
    ///
    /// See [`Extractor::extract`].
    pub fn extract_observed<F>(
        &self,
        source: &Path,
        dest_root: &Path,
        mut on_attempt: F,
    ) -> Result<ExtractOutcome>
    where
        F: FnMut(u32),
    {
        let target = TargetDir::for_archive(source, dest_root)?;

        let (outcome, attempts) = retry_on_lock(self.retry, source, |attempt| {
            on_attempt(attempt);
            self.attempt(source, &target)
        })?;

        Ok(match outcome {
            ExtractOutcome::Extracted(mut info) => {
                info.attempts = attempts;
                ExtractOutcome::Extracted(info)
            }
            skipped @ ExtractOutcome::Skipped(_) => skipped,
        })
    }

    fn attempt(&self, source: &Path, target: &TargetDir) -> Result<ExtractOutcome> {
        let start = Instant::now();

        let opened = match self.opener.open(source) {
            Ok(opened) => opened,
            Err(e) => return unreadable(e, source),
        };
        let (mut reader, fault) = TrackedSource::new(opened);

        let kind = match try_classify_reader(&mut reader, source) {
            Ok(kind) => kind,
            Err(e) => return unreadable(e, source),
        };
        if let Some(e) = fault.error() {
            return unreadable(e, source);
        }
        if kind == ArchiveKind::Unknown {
            tracing::debug!("[extract] {} is not a supported archive", source.display());
            return Ok(ExtractOutcome::Skipped(SkipReason::UnrecognizedFormat));
        }

        target.ensure_exists()?;
        tracing::debug!(
            "[extract] {} as {kind} into {}",
            source.display(),
            target.as_path().display()
        );

        let extracted =
            open_handler(kind, reader).and_then(|mut handler| handler.extract(target.as_path()));
        match extracted {
            Ok(mut info) => {
                info.duration = start.elapsed();
                Ok(ExtractOutcome::Extracted(info))
            }
            // A failed source read outranks whatever the format made of it.
            Err(err) => match fault.error() {
                Some(e) => {
                    tracing::debug!("[extract] {} read failed mid-way: {err}", source.display());
                    unreadable(e, source)
                }
                None => Err(err),
            },
        }
    }
}

/// Outcome for a source that could not be opened or read. Only a vanished
/// source is a skip; locks are returned as errors so the retry loop sees them.
fn unreadable(err: io::Error, source: &Path) -> Result<ExtractOutcome> {
    match ExtractionError::from_io(err, source) {
        ExtractionError::VanishedSource { .. } => {
            tracing::debug!("[extract] {} vanished", source.display());
            Ok(ExtractOutcome::Skipped(SkipReason::VanishedSource))
        }
        other => Err(other),
    }
}
