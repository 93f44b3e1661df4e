//! In-memory archive builders for tests.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Creates an in-memory tar archive of regular files (mode 0o644).
///
/// # Examples
///
/// ```
/// use arcwatch_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(&[("game.exe", "MZ"), ("data/level1.pak", "level")]);
/// assert_eq!(tar_data.len() % 512, 0);
/// ```
#[must_use]
pub fn create_test_tar<D: AsRef<[u8]>>(entries: &[(&str, D)]) -> Vec<u8> {
    entries
        .iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data.as_ref())
        })
        .build()
}

/// Creates an in-memory zip archive of stored (uncompressed) files.
///
/// # Examples
///
/// ```
/// use arcwatch_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("game.exe", "MZ"), ("data/level1.pak", "level")]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip<D: AsRef<[u8]>>(entries: &[(&str, D)]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data.as_ref())
        })
        .build()
}

/// Creates an in-memory 7z archive of files, with an explicit entry for
/// every parent directory.
///
/// # Examples
///
/// ```
/// use arcwatch_core::test_utils::create_test_sevenz;
///
/// let data = create_test_sevenz(&[("game.exe", "MZ"), ("data/level1.pak", "level")]);
/// assert!(data.starts_with(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]));
/// ```
#[must_use]
pub fn create_test_sevenz<D: AsRef<[u8]>>(entries: &[(&str, D)]) -> Vec<u8> {
    use sevenz_rust2::ArchiveEntry;
    use sevenz_rust2::ArchiveWriter;

    let mut writer = ArchiveWriter::new(Cursor::new(Vec::new())).unwrap();
    let mut dirs: Vec<String> = Vec::new();
    for (path, data) in entries {
        let parents: Vec<&Path> = Path::new(path)
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        for dir in parents.into_iter().rev() {
            let name = dir.to_string_lossy().into_owned();
            if !dirs.contains(&name) {
                writer
                    .push_archive_entry::<&[u8]>(ArchiveEntry::new_directory(&name), None)
                    .unwrap();
                dirs.push(name);
            }
        }
        let bytes: &[u8] = data.as_ref();
        writer
            .push_archive_entry(ArchiveEntry::new_file(path), Some(bytes))
            .unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Wraps `data` in a gzip stream.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builder for tar test archives with files, directories and links.
///
/// # Examples
///
/// ```
/// use arcwatch_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("bin/")
///     .add_file("bin/game", b"\x7fELF")
///     .add_symlink("game", "bin/game")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is written verbatim into the header,
    /// bypassing the `..` check `tar::Builder` applies to paths.
    #[must_use]
    pub fn add_raw_path_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_old();
        let name = &mut header.as_old_mut().name;
        let len = path.len().min(name.len());
        name[..len].copy_from_slice(&path.as_bytes()[..len]);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.append_link(path, target, tar::EntryType::Symlink);
        self
    }

    /// Adds a hardlink.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        self.append_link(path, target, tar::EntryType::Link);
        self
    }

    /// Adds a named pipe, an entry type extraction does not support.
    #[must_use]
    pub fn add_fifo(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Fifo);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    fn append_link(&mut self, path: &str, target: &str, kind: tar::EntryType) {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(kind);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for zip test archives.
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflate-compressed file.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
