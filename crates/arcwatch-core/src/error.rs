//! Error types for the watch-extract pipeline.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Windows `ERROR_SHARING_VIOLATION`.
#[cfg(windows)]
const ERROR_SHARING_VIOLATION: i32 = 32;

/// Windows `ERROR_LOCK_VIOLATION`.
#[cfg(windows)]
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Errors that can occur while extracting a single archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file is open or locked by another process.
    #[error("file is locked by another process: {path}")]
    LockedResource {
        /// The locked file.
        path: PathBuf,
    },

    /// The source file stayed locked for the whole retry budget.
    #[error("file still locked after {attempts} attempts: {path}")]
    RetriesExhausted {
        /// The locked file.
        path: PathBuf,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The source file disappeared between detection and extraction.
    #[error("file vanished before extraction: {path}")]
    VanishedSource {
        /// The missing file.
        path: PathBuf,
    },

    /// The file matches none of the supported container signatures.
    #[error("unrecognized archive format")]
    UnrecognizedFormat,

    /// The destination root is missing, not a directory, or not writable.
    #[error("destination is not usable: {path}: {reason}")]
    DestinationUnwritable {
        /// The destination path.
        path: PathBuf,
        /// Why the destination was rejected.
        reason: String,
    },

    /// The watched source root is missing or not a readable directory.
    #[error("source is not usable: {path}: {reason}")]
    SourceUnreadable {
        /// The source path.
        path: PathBuf,
        /// Why the source was rejected.
        reason: String,
    },

    /// The archive path has no parent folder to name the target after.
    #[error("archive has no parent folder: {path}")]
    InvalidSource {
        /// The archive path.
        path: PathBuf,
    },

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry tried to escape the target directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry path.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Maps an I/O error raised while touching `path` onto the pipeline's
    /// taxonomy.
    ///
    /// Permission denials and Windows sharing/lock violations become
    /// [`ExtractionError::LockedResource`]; a missing file becomes
    /// [`ExtractionError::VanishedSource`]. Everything else stays
    /// [`ExtractionError::Io`].
    ///
    /// # Examples
    ///
    /// ```
    /// use arcwatch_core::ExtractionError;
    /// use std::io;
    /// use std::path::Path;
    ///
    /// let err = io::Error::new(io::ErrorKind::PermissionDenied, "busy");
    /// let err = ExtractionError::from_io(err, Path::new("game.zip"));
    /// assert!(err.is_transient_lock());
    /// ```
    #[must_use]
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        if is_lock_error(&err) {
            return Self::LockedResource {
                path: path.to_path_buf(),
            };
        }
        if err.kind() == io::ErrorKind::NotFound {
            return Self::VanishedSource {
                path: path.to_path_buf(),
            };
        }
        Self::Io(err)
    }

    /// Returns `true` if retrying later may succeed.
    #[must_use]
    pub const fn is_transient_lock(&self) -> bool {
        matches!(self, Self::LockedResource { .. })
    }

    /// Returns `true` for conditions that end a task without any log line.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcwatch_core::ExtractionError;
    ///
    /// assert!(ExtractionError::UnrecognizedFormat.is_silent());
    /// assert!(!ExtractionError::InvalidArchive("bad".into()).is_silent());
    /// ```
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::VanishedSource { .. } | Self::UnrecognizedFormat)
    }

    /// Returns `true` if this error is a configuration problem detected
    /// before any watching starts.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::DestinationUnwritable { .. } | Self::SourceUnreadable { .. })
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::DestinationUnwritable { reason, .. } | Self::SourceUnreadable { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

fn is_lock_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    #[cfg(windows)]
    {
        if let Some(code) = err.raw_os_error() {
            return code == ERROR_SHARING_VIOLATION || code == ERROR_LOCK_VIOLATION;
        }
    }
    false
}

/// Errors raised when starting or running a watch.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The source or destination root was rejected.
    #[error(transparent)]
    Spec(#[from] ExtractionError),

    /// The notification backend could not be initialized.
    #[error("failed to initialize watcher: {0}")]
    Notify(String),

    /// A worker thread could not be spawned.
    #[error("failed to spawn extraction worker: {0}")]
    WorkerSpawn(String),
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        Self::Notify(e.to_string())
    }
}
