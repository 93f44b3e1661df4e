//! Retry-under-lock extraction of single files.

pub mod extractor;
pub mod retry;
pub mod source;
pub mod task;

pub use extractor::Extractor;
pub use extractor::FsOpener;
pub use extractor::SourceOpener;
pub use source::SourceReader;
pub use task::ArchiveEvent;
pub use task::ExtractionTask;
pub use task::TaskStatus;
