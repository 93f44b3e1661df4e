//! Archive format classification and per-format handlers.

pub mod common;
pub mod compression;
pub mod detect;
pub mod sevenz;
pub mod tar;
pub mod traits;
pub mod zip;

use std::io::Read;
use std::io::Seek;

pub use self::detect::ArchiveKind;
pub use self::sevenz::SevenZipFormat;
pub use self::tar::TarFormat;
pub use self::traits::ArchiveFormat;
pub use self::zip::ZipFormat;

use crate::ExtractionError;
use crate::Result;

/// Builds the handler for an already classified archive.
///
/// # Errors
///
/// Returns [`ExtractionError::UnrecognizedFormat`] for
/// [`ArchiveKind::Unknown`], or the handler's own error when the archive
/// header cannot be read.
pub fn open_handler<R>(kind: ArchiveKind, source: R) -> Result<Box<dyn ArchiveFormat>>
where
    R: Read + Seek + 'static,
{
    Ok(match kind {
        ArchiveKind::Zip => Box::new(ZipFormat::new(source)?),
        ArchiveKind::Tar(codec) => Box::new(TarFormat::new(source, codec)?),
        ArchiveKind::SevenZip => Box::new(SevenZipFormat::new(source)?),
        ArchiveKind::Unknown => return Err(ExtractionError::UnrecognizedFormat),
    })
}
