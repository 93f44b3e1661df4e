//! Validated destination root.

use crate::ExtractionError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// A destination root that existed, was a directory and was writable when
/// the watch started.
///
/// The root is never created by this crate: a missing destination is a
/// configuration error.
///
/// # Examples
///
/// ```no_run
/// use arcwatch_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/games/Installations")?;
/// println!("Extracting under: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates `path` and canonicalizes it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::DestinationUnwritable`] if the path does not
    /// exist, is not a directory, cannot be canonicalized, or (on Unix) is
    /// not writable by the current process.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reject = |reason: String| ExtractionError::DestinationUnwritable {
            path: path.clone(),
            reason,
        };

        if !path.exists() {
            return Err(reject("directory does not exist".into()));
        }
        if !path.is_dir() {
            return Err(reject("path is not a directory".into()));
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| reject(format!("failed to canonicalize: {e}")))?;

        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes())
                .map_err(|_| reject("path contains null byte".into()))?;

            // SAFETY: access() only reads the NUL-terminated string, which
            // outlives the call.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(reject("directory is not writable".into()));
            }
        }

        #[cfg(not(unix))]
        {
            let metadata = std::fs::metadata(&canonical)
                .map_err(|e| reject(format!("failed to read metadata: {e}")))?;
            if metadata.permissions().readonly() {
                return Err(reject("directory is read-only".into()));
            }
        }

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
