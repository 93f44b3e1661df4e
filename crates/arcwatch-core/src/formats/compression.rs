//! Compression codecs that can wrap a tar stream.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)
//!
//! Codecs are recognized by their leading magic bytes, never by extension.

use std::io;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const BZIP2_MAGIC: [u8; 3] = *b"BZh";
const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Number of leading bytes needed to recognize any supported codec.
pub const MAGIC_PROBE_LEN: usize = 6;

/// Compression codec wrapping a tar archive.
///
/// # Examples
///
/// ```
/// use arcwatch_core::formats::compression::CompressionCodec;
///
/// let codec = CompressionCodec::from_magic(&[0x1F, 0x8B, 0x08, 0x00]);
/// assert_eq!(codec, Some(CompressionCodec::Gzip));
/// assert_eq!(CompressionCodec::from_magic(b"ustar"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,
    /// Bzip2 compression.
    Bzip2,
    /// Xz compression (LZMA2 algorithm).
    Xz,
    /// Zstd compression.
    Zstd,
}

impl CompressionCodec {
    /// Recognizes a codec from the first bytes of a file.
    #[must_use]
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        if head.starts_with(&XZ_MAGIC) {
            Some(Self::Xz)
        } else if head.starts_with(&ZSTD_MAGIC) {
            Some(Self::Zstd)
        } else if head.starts_with(&BZIP2_MAGIC) {
            Some(Self::Bzip2)
        } else if head.starts_with(&GZIP_MAGIC) {
            Some(Self::Gzip)
        } else {
            None
        }
    }

    /// Wraps `reader` in the matching streaming decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be initialized (zstd reads its
    /// frame header eagerly).
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }

    /// Returns the typical file extension for this codec when used with TAR.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Xz => "tar.xz",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}
