//! 7z archive format extraction.
//!
//! Files reach this handler on the strength of their `.7z` suffix alone, so
//! [`SevenZipFormat::new`] is where a misnamed file is finally rejected: the
//! archive header is parsed up front and anything unreadable surfaces as
//! [`ExtractionError::InvalidArchive`].
//!
//! # Limitations (sevenz-rust2 0.20)
//!
//! - Encrypted archives are rejected.
//! - Unix symlinks cannot be detected and are extracted as regular files
//!   whose content is the link target.

use std::cell::RefCell;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use sevenz_rust2::Archive;
use sevenz_rust2::Password;

use crate::ArchiveKind;
use crate::ExtractedInfo;
use crate::ExtractionError;
use crate::Result;

use super::common;
use super::traits::ArchiveFormat;

/// 7z archive handler.
#[derive(Debug)]
pub struct SevenZipFormat<R: Read + Seek> {
    source: R,
    entry_count: usize,
}

impl<R: Read + Seek> SevenZipFormat<R> {
    /// Reads the archive header and rewinds the source for extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidArchive`] if the header cannot be
    /// parsed or the archive is encrypted.
    pub fn new(mut source: R) -> Result<Self> {
        let password = Password::empty();
        let archive = Archive::read(&mut source, &password).map_err(|e| {
            let message = e.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("encrypt") || lowered.contains("password") {
                return ExtractionError::InvalidArchive(
                    "encrypted 7z archives are not supported".into(),
                );
            }
            ExtractionError::InvalidArchive(format!("failed to open 7z archive: {message}"))
        })?;
        let entry_count = archive.files.len();

        source.rewind()?;
        Ok(Self {
            source,
            entry_count,
        })
    }

    /// Number of entries listed in the archive header.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }
}

impl<R: Read + Seek> ArchiveFormat for SevenZipFormat<R> {
    fn extract(&mut self, target: &Path) -> Result<ExtractedInfo> {
        let info = RefCell::new(ExtractedInfo::new(self.kind(), target.to_path_buf()));
        // The callback can only return sevenz errors; keep ours to rethrow.
        let failure: RefCell<Option<ExtractionError>> = RefCell::new(None);

        let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                          reader: &mut dyn Read,
                          _dest_dir: &PathBuf|
         -> std::result::Result<bool, sevenz_rust2::Error> {
            let result = write_entry(entry, reader, target, &mut info.borrow_mut());
            match result {
                Ok(()) => Ok(true),
                Err(e) => {
                    let message = e.to_string();
                    *failure.borrow_mut() = Some(e);
                    Err(sevenz_rust2::Error::Other(message.into()))
                }
            }
        };

        let outcome =
            sevenz_rust2::decompress_with_extract_fn(&mut self.source, target, extract_fn);

        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        outcome.map_err(|e| ExtractionError::InvalidArchive(format!("7z extraction failed: {e}")))?;

        Ok(info.into_inner())
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::SevenZip
    }
}

fn write_entry(
    entry: &sevenz_rust2::ArchiveEntry,
    reader: &mut dyn Read,
    target: &Path,
    info: &mut ExtractedInfo,
) -> Result<()> {
    let name = PathBuf::from(&entry.name);
    let dest = common::entry_destination(target, &name)?;

    if entry.is_directory() {
        common::create_directory(&dest, info)
    } else {
        common::write_file(reader, &dest, info)
    }
}
