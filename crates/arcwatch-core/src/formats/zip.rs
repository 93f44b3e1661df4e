//! ZIP archive format handler.

use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveKind;
use crate::ExtractedInfo;
use crate::ExtractionError;
use crate::Result;

use super::common;
use super::traits::ArchiveFormat;

/// ZIP archive handler.
///
/// Symlink entries are skipped; every other entry is written below the
/// target directory.
pub struct ZipFormat<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipFormat<R> {
    /// Opens a ZIP archive by reading its central directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the central directory cannot be parsed.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: zip::ZipArchive::new(reader)?,
        })
    }

    /// Number of entries in the central directory.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ArchiveFormat for ZipFormat<R> {
    fn extract(&mut self, target: &Path) -> Result<ExtractedInfo> {
        let mut info = ExtractedInfo::new(self.kind(), target.to_path_buf());

        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index(index)?;
            let raw_name = PathBuf::from(entry.name());
            let Some(name) = entry.enclosed_name() else {
                return Err(ExtractionError::PathTraversal { path: raw_name });
            };
            let dest = common::entry_destination(target, &name)?;

            if entry.is_dir() {
                common::create_directory(&dest, &mut info)?;
            } else if entry.is_symlink() {
                common::skip_entry(&name, "symlink", &mut info);
            } else {
                common::write_file(&mut entry, &dest, &mut info)?;
            }
        }

        Ok(info)
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Zip
    }
}
