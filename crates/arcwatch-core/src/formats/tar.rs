//! Tar archive format handler.

use std::io::Read;
use std::path::Path;

use crate::ArchiveKind;
use crate::ExtractedInfo;
use crate::Result;

use super::common;
use super::compression::CompressionCodec;
use super::traits::ArchiveFormat;

/// Tar archive handler, plain or behind a compression codec.
///
/// Regular files and directories are extracted. Symlinks, hardlinks and
/// device entries are skipped and reported as warnings.
pub struct TarFormat<'a> {
    archive: tar::Archive<Box<dyn Read + 'a>>,
    codec: Option<CompressionCodec>,
}

impl<'a> TarFormat<'a> {
    /// Wraps `reader`, decompressing with `codec` if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be initialized.
    pub fn new<R: Read + 'a>(reader: R, codec: Option<CompressionCodec>) -> Result<Self> {
        let stream: Box<dyn Read + 'a> = match codec {
            Some(codec) => codec.decoder(reader)?,
            None => Box::new(reader),
        };
        Ok(Self {
            archive: tar::Archive::new(stream),
            codec,
        })
    }
}

impl ArchiveFormat for TarFormat<'_> {
    fn extract(&mut self, target: &Path) -> Result<ExtractedInfo> {
        let mut info = ExtractedInfo::new(self.kind(), target.to_path_buf());

        for entry in self.archive.entries()? {
            let mut entry = entry?;
            let name = entry.path()?.into_owned();
            let dest = common::entry_destination(target, &name)?;
            let entry_type = entry.header().entry_type();

            if entry_type.is_dir() {
                common::create_directory(&dest, &mut info)?;
            } else if entry_type.is_file() {
                common::write_file(&mut entry, &dest, &mut info)?;
            } else if entry_type.is_symlink() {
                common::skip_entry(&name, "symlink", &mut info);
            } else if entry_type.is_hard_link() {
                common::skip_entry(&name, "hardlink", &mut info);
            } else {
                common::skip_entry(&name, "unsupported entry type", &mut info);
            }
        }

        Ok(info)
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Tar(self.codec)
    }
}
