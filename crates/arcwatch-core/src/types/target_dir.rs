//! Per-archive output directory.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// Where one archive is unpacked: `dest_root / <name of the archive's parent
/// folder>`.
///
/// Every archive inside the same release folder lands in the same target
/// directory, so a release split across several archives is reassembled in
/// one place. Existing files there are overwritten.
///
/// # Examples
///
/// ```
/// use arcwatch_core::types::TargetDir;
/// use std::path::Path;
///
/// let target = TargetDir::for_archive(
///     Path::new("/downloads/ReleaseA/part1.zip"),
///     Path::new("/installs"),
/// )
/// .unwrap();
/// assert_eq!(target.as_path(), Path::new("/installs/ReleaseA"));
/// assert_eq!(target.group_name(), "ReleaseA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDir {
    path: PathBuf,
    group: String,
}

impl TargetDir {
    /// Derives the target directory for `source` under `dest_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidSource`] if `source` has no named
    /// parent folder.
    pub fn for_archive(source: &Path, dest_root: &Path) -> Result<Self> {
        let group = source
            .parent()
            .and_then(Path::file_name)
            .ok_or_else(|| ExtractionError::InvalidSource {
                path: source.to_path_buf(),
            })?;

        Ok(Self {
            path: dest_root.join(group),
            group: group.to_string_lossy().into_owned(),
        })
    }

    /// Creates the directory (and any missing parents). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.path)?;
        Ok(())
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Name of the archive's parent folder.
    #[inline]
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group
    }
}

impl AsRef<Path> for TargetDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
