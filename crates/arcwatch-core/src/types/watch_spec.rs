//! Validated source/destination pair for a watch.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::DestDir;

/// What to watch and where to extract. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    source_root: PathBuf,
    destination_root: DestDir,
}

impl WatchSpec {
    /// Validates both roots.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::SourceUnreadable`] if `source_root` is not
    /// an existing, listable directory, or
    /// [`ExtractionError::DestinationUnwritable`] if `destination_root` fails
    /// [`DestDir::new`].
    pub fn new(
        source_root: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let source_root = source_root.into();
        let reject = |reason: String| ExtractionError::SourceUnreadable {
            path: source_root.clone(),
            reason,
        };

        if !source_root.exists() {
            return Err(reject("directory does not exist".into()));
        }
        if !source_root.is_dir() {
            return Err(reject("path is not a directory".into()));
        }
        fs::read_dir(&source_root).map_err(|e| reject(format!("cannot list directory: {e}")))?;

        let source_root = source_root
            .canonicalize()
            .map_err(|e| reject(format!("failed to canonicalize: {e}")))?;
        let destination_root = DestDir::new(destination_root)?;

        Ok(Self {
            source_root,
            destination_root,
        })
    }

    /// Canonical watched root.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Canonical destination root.
    #[must_use]
    pub fn destination_root(&self) -> &Path {
        self.destination_root.as_path()
    }
}
