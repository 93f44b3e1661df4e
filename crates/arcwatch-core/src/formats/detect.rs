//! Archive format classification.
//!
//! Detection order is fixed: a structural zip check, then a structural tar
//! check (seeing through gzip/bzip2/xz/zstd), then the `.7z` file suffix.
//! The 7z case is suffix-only: any file named `*.7z` that is not a zip or tar
//! is classified as [`ArchiveKind::SevenZip`] regardless of its content.

use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use super::compression::CompressionCodec;
use super::compression::MAGIC_PROBE_LEN;

/// 7z signature: `37 7A BC AF 27 1C`.
///
/// Only used for diagnostics; acceptance of 7z files is by suffix.
const SEVENZ_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];

const TAR_BLOCK_LEN: usize = 512;

/// Archive kinds the extractor knows how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// ZIP archive.
    Zip,
    /// Tar archive, optionally wrapped in a compression codec.
    Tar(Option<CompressionCodec>),
    /// 7z archive (recognized by the `.7z` suffix only).
    SevenZip,
    /// Not a supported archive, or not one yet (still being written).
    Unknown,
}

impl ArchiveKind {
    /// Returns `true` for every kind except [`ArchiveKind::Unknown`].
    #[must_use]
    pub const fn is_archive(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Short human-readable format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar(None) => "tar",
            Self::Tar(Some(codec)) => codec.extension(),
            Self::SevenZip => "7z",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies the file at `path`.
///
/// Never fails: a file that cannot be opened or read is [`ArchiveKind::Unknown`].
///
/// # Examples
///
/// ```no_run
/// use arcwatch_core::ArchiveKind;
/// use arcwatch_core::classify;
/// use std::path::Path;
///
/// let kind = classify(Path::new("/downloads/ReleaseA/game.zip"));
/// if kind == ArchiveKind::Unknown {
///     println!("not an archive (yet)");
/// }
/// ```
#[must_use]
pub fn classify(path: &Path) -> ArchiveKind {
    match File::open(path) {
        Ok(mut file) => classify_reader(&mut file, path),
        Err(e) => {
            tracing::debug!("[classify] cannot open {}: {e}", path.display());
            ArchiveKind::Unknown
        }
    }
}

/// Classifies an already-open archive; `path` is consulted for the suffix
/// check only.
///
/// Unreadable sources are [`ArchiveKind::Unknown`]; use
/// [`try_classify_reader`] to tell them apart. The reader is rewound to its
/// start before returning.
pub fn classify_reader<R: Read + Seek>(reader: &mut R, path: &Path) -> ArchiveKind {
    try_classify_reader(reader, path).unwrap_or_else(|e| {
        tracing::debug!("[classify] cannot read {}: {e}", path.display());
        let _ = reader.rewind();
        ArchiveKind::Unknown
    })
}

/// Like [`classify_reader`], but a source that cannot be read is an error
/// rather than [`ArchiveKind::Unknown`].
///
/// Only a content mismatch yields `Unknown`, so a file still locked by its
/// writer is never mistaken for a non-archive.
///
/// # Errors
///
/// Returns the I/O error hit while rewinding or reading the head of the
/// source.
pub fn try_classify_reader<R: Read + Seek>(
    reader: &mut R,
    path: &Path,
) -> io::Result<ArchiveKind> {
    reader.rewind()?;
    let mut head = [0u8; MAGIC_PROBE_LEN];
    read_up_to(reader, &mut head)?;

    let kind = if is_zip(reader) {
        ArchiveKind::Zip
    } else if let Some(codec) = tar_codec(reader) {
        ArchiveKind::Tar(codec)
    } else if has_sevenz_suffix(path) {
        if !has_sevenz_magic(reader) {
            tracing::debug!(
                "[classify] {} has a .7z suffix but no 7z signature",
                path.display()
            );
        }
        ArchiveKind::SevenZip
    } else {
        ArchiveKind::Unknown
    };

    reader.rewind()?;
    Ok(kind)
}

fn is_zip<R: Read + Seek>(reader: &mut R) -> bool {
    if reader.rewind().is_err() {
        return false;
    }
    zip::ZipArchive::new(&mut *reader).is_ok()
}

/// Returns `Some(codec)` if the stream starts with a valid tar header,
/// possibly behind a compression codec.
fn tar_codec<R: Read + Seek>(reader: &mut R) -> Option<Option<CompressionCodec>> {
    reader.rewind().ok()?;
    let mut head = [0u8; MAGIC_PROBE_LEN];
    let head_len = read_up_to(reader, &mut head).ok()?;
    let codec = CompressionCodec::from_magic(&head[..head_len]);

    reader.rewind().ok()?;
    let mut block = [0u8; TAR_BLOCK_LEN];
    let read = match codec {
        Some(codec) => codec
            .decoder(&mut *reader)
            .and_then(|mut decoder| decoder.read_exact(&mut block)),
        None => reader.read_exact(&mut block),
    };
    if read.is_err() {
        return None;
    }

    is_tar_header(&block).then_some(codec)
}

/// A tar header is valid when its stored checksum matches the checksum
/// computed over the block.
fn is_tar_header(block: &[u8; TAR_BLOCK_LEN]) -> bool {
    let header = tar::Header::from_byte_slice(block);
    let Ok(stored) = header.cksum() else {
        return false;
    };
    let mut recomputed = header.clone();
    recomputed.set_cksum();
    recomputed.cksum().is_ok_and(|computed| computed == stored)
}

fn has_sevenz_suffix(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "7z")
}

fn has_sevenz_magic<R: Read + Seek>(reader: &mut R) -> bool {
    if reader.rewind().is_err() {
        return false;
    }
    let mut head = [0u8; SEVENZ_MAGIC.len()];
    read_up_to(reader, &mut head).is_ok_and(|n| n == head.len()) && head == SEVENZ_MAGIC
}

/// Fills as much of `buf` as the stream holds; stops early only at EOF.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
