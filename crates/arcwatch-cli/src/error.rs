//! Error conversion utilities for CLI.
//!
//! Converts arcwatch-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use arcwatch_core::ExtractionError;
use arcwatch_core::WatchError;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Archive '{}' has an entry escaping the target directory: '{}'\n\
                 HINT: Nothing outside the target was written. Do not trust this archive.",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::RetriesExhausted { attempts, .. } => {
            anyhow!(
                "'{}' was still locked after {attempts} attempts\n\
                 HINT: Wait for the download to finish, \
                 or raise --max-attempts / --retry-interval.",
                archive.display()
            )
        }
        ExtractionError::UnrecognizedFormat => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, tar, tar.gz, tar.bz2, tar.xz, tar.zst, 7z",
                archive.display()
            )
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted, incomplete, or misnamed.",
                archive.display(),
                reason
            )
        }
        ExtractionError::InvalidSource { path } => {
            anyhow!(
                "Cannot derive a target folder for '{}': it has no parent folder\n\
                 HINT: Place the archive inside a folder named after the release.",
                path.display()
            )
        }
        err @ ExtractionError::DestinationUnwritable { .. } => convert_configuration_error(err),
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Converts watch-root validation errors, which carry their own path
pub fn convert_configuration_error(err: ExtractionError) -> anyhow::Error {
    match err {
        ExtractionError::DestinationUnwritable { path, reason } => {
            anyhow!(
                "Destination '{}' is not usable: {reason}\n\
                 HINT: The destination folder is never created automatically. Create it first.",
                path.display()
            )
        }
        ExtractionError::SourceUnreadable { path, reason } => {
            anyhow!(
                "Source '{}' is not usable: {reason}\n\
                 HINT: Check the path, or point --launcher-config at the right file.",
                path.display()
            )
        }
        other => anyhow::Error::from(other),
    }
}

/// Converts errors raised while starting a watch
pub fn convert_watch_error(err: WatchError) -> anyhow::Error {
    match err {
        WatchError::Spec(inner) => convert_configuration_error(inner),
        WatchError::Notify(reason) => {
            anyhow!(
                "Cannot watch the source folder: {reason}\n\
                 HINT: On Linux, check fs.inotify.max_user_watches."
            )
        }
        WatchError::WorkerSpawn(reason) => {
            anyhow!(
                "Cannot start extraction workers: {reason}\n\
                 HINT: Try a lower --workers value."
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_path_traversal_error() {
        let err = ExtractionError::PathTraversal {
            path: PathBuf::from("../../../etc/passwd"),
        };
        let converted = convert_extraction_error(err, Path::new("malicious.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("escaping the target"));
        assert!(msg.contains("malicious.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_retries_exhausted() {
        let err = ExtractionError::RetriesExhausted {
            path: PathBuf::from("game.zip"),
            attempts: 360,
        };
        let msg = format!("{:?}", convert_extraction_error(err, Path::new("game.zip")));
        assert!(msg.contains("360 attempts"));
        assert!(msg.contains("--max-attempts"));
    }

    #[test]
    fn test_convert_destination_error() {
        let err = ExtractionError::DestinationUnwritable {
            path: PathBuf::from("/games/Installations"),
            reason: "directory does not exist".into(),
        };
        let msg = format!("{:?}", convert_watch_error(WatchError::Spec(err)));
        assert!(msg.contains("/games/Installations"));
        assert!(msg.contains("Create it first"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ExtractionError::Io(io_err);
        let converted = convert_extraction_error(err, Path::new("archive.tar.gz"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }
}
