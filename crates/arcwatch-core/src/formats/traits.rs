//! Common trait for archive format handlers.

use std::path::Path;

use crate::ArchiveKind;
use crate::ExtractedInfo;
use crate::Result;

/// Trait for archive format handlers.
pub trait ArchiveFormat {
    /// Extracts the archive into `target`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is invalid, an entry would escape
    /// `target`, or writing fails.
    fn extract(&mut self, target: &Path) -> Result<ExtractedInfo>;

    /// Returns the archive kind this handler unpacks.
    fn kind(&self) -> ArchiveKind;

    /// Returns the archive format name.
    fn format_name(&self) -> &'static str {
        self.kind().name()
    }
}
