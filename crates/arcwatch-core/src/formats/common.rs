//! Extraction helpers shared between the zip, tar and 7z handlers.
//!
//! # Functions
//!
//! - [`entry_destination`]: resolve an entry name inside the target directory
//! - [`write_file`]: buffered file extraction
//! - [`create_directory`]: directory creation (idempotent)

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractedInfo;
use crate::ExtractionError;
use crate::Result;

const WRITE_BUFFER_LEN: usize = 64 * 1024;

/// Resolves an archive entry name to its location under `target`.
///
/// `.` components are dropped. Absolute paths, drive prefixes and `..`
/// components are rejected so nothing is written outside `target`.
///
/// # Errors
///
/// Returns [`ExtractionError::PathTraversal`] for names that would escape.
///
/// # Examples
///
/// ```
/// use arcwatch_core::formats::common::entry_destination;
/// use std::path::Path;
///
/// let dest = entry_destination(Path::new("/out"), Path::new("./data/a.txt")).unwrap();
/// assert_eq!(dest, Path::new("/out/data/a.txt"));
/// assert!(entry_destination(Path::new("/out"), Path::new("../a.txt")).is_err());
/// ```
pub fn entry_destination(target: &Path, entry_name: &Path) -> Result<PathBuf> {
    let mut resolved = target.to_path_buf();
    for component in entry_name.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractionError::PathTraversal {
                    path: entry_name.to_path_buf(),
                });
            }
        }
    }
    Ok(resolved)
}

/// Writes one file entry to `dest` and records it in `info`.
///
/// Parent directories are created as needed; an existing file is
/// overwritten.
pub fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    dest: &Path,
    info: &mut ExtractedInfo,
) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }

    let output = File::create(dest)?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_LEN, output);
    let written = std::io::copy(reader, &mut writer)?;
    writer.flush()?;

    info.files_extracted += 1;
    info.bytes_written = info.bytes_written.saturating_add(written);
    Ok(())
}

/// Creates a directory entry and records it in `info`.
pub fn create_directory(dest: &Path, info: &mut ExtractedInfo) -> Result<()> {
    create_dir_all(dest)?;
    info.directories_created += 1;
    Ok(())
}

/// Records an entry that was deliberately not extracted.
pub fn skip_entry(name: &Path, why: &str, info: &mut ExtractedInfo) {
    tracing::debug!("[extract] skipping {}: {why}", name.display());
    info.entries_skipped += 1;
    info.add_warning(format!("skipped {}: {why}", name.display()));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveKind;
    use tempfile::TempDir;

    #[test]
    fn test_entry_destination_nested() {
        let dest = entry_destination(Path::new("/out"), Path::new("a/b/c.txt")).unwrap();
        assert_eq!(dest, PathBuf::from("/out/a/b/c.txt"));
    }

    #[test]
    fn test_entry_destination_rejects_parent() {
        let result = entry_destination(Path::new("/out"), Path::new("a/../../etc/passwd"));
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[test]
    fn test_entry_destination_rejects_absolute() {
        let result = entry_destination(Path::new("/out"), Path::new("/etc/passwd"));
        assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
    }

    #[test]
    fn test_write_file_creates_parents_and_counts() {
        let temp = TempDir::new().unwrap();
        let mut info = ExtractedInfo::new(ArchiveKind::Zip, temp.path().to_path_buf());
        let dest = temp.path().join("x/y/z.txt");

        write_file(&mut &b"hello"[..], &dest, &mut info).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
        assert_eq!(info.files_extracted, 1);
        assert_eq!(info.bytes_written, 5);
    }

    #[test]
    fn test_write_file_overwrites() {
        let temp = TempDir::new().unwrap();
        let mut info = ExtractedInfo::new(ArchiveKind::Zip, temp.path().to_path_buf());
        let dest = temp.path().join("f.txt");

        write_file(&mut &b"first version"[..], &dest, &mut info).unwrap();
        write_file(&mut &b"second"[..], &dest, &mut info).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "second");
    }

    #[test]
    fn test_skip_entry_records_warning() {
        let mut info = ExtractedInfo::new(ArchiveKind::Tar(None), PathBuf::from("/out"));
        skip_entry(Path::new("link"), "symlink", &mut info);
        assert_eq!(info.entries_skipped, 1);
        assert!(info.has_warnings());
    }
}
