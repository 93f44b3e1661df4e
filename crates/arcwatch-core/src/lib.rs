//! Watch a download folder and unpack every archive that lands in it.
//!
//! `arcwatch-core` monitors a source tree recursively. Each new file is
//! classified (zip, tar with optional compression, or 7z by suffix) and, if it
//! is an archive, extracted into `destination_root/<name of the archive's
//! parent folder>`. Files still held open by a downloader are retried on a
//! fixed interval.
//!
//! # Examples
//!
//! ```no_run
//! use arcwatch_core::WatchOptions;
//! use arcwatch_core::WatchSpec;
//! use arcwatch_core::sink::TracingSink;
//! use arcwatch_core::start_watch;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = WatchSpec::new("/games/Downloads", "/games/Installations")?;
//! let handle = start_watch(spec, &WatchOptions::default(), Arc::new(TracingSink))?;
//! std::thread::park();
//! handle.stop().wait();
//! # Ok(())
//! # }
//! ```
//!
//! Single archives can be extracted without a watch:
//!
//! ```no_run
//! use arcwatch_core::Extractor;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = Extractor::new().extract(
//!     Path::new("/games/Downloads/ReleaseA/game.zip"),
//!     Path::new("/games/Installations"),
//! )?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod sink;
pub mod types;
pub mod watch;

#[doc(hidden)]
pub mod test_utils;

pub use config::RetryPolicy;
pub use config::WatchOptions;
pub use error::ExtractionError;
pub use error::Result;
pub use error::WatchError;
pub use extraction::ArchiveEvent;
pub use extraction::ExtractionTask;
pub use extraction::Extractor;
pub use extraction::SourceOpener;
pub use extraction::SourceReader;
pub use extraction::TaskStatus;
pub use formats::ArchiveKind;
pub use formats::compression::CompressionCodec;
pub use formats::detect::classify;
pub use report::ExtractOutcome;
pub use report::ExtractedInfo;
pub use report::SkipReason;
pub use sink::LogSink;
pub use sink::SharedSink;
pub use types::DestDir;
pub use types::TargetDir;
pub use types::WatchSpec;
pub use watch::Drain;
pub use watch::WatchHandle;
pub use watch::start_watch;
pub use watch::start_watch_with;
pub use watch::stop_watch;
