//! Validated path types.
//!
//! Each type checks its invariants in its constructor; none can be built
//! from a raw `PathBuf` without going through validation.

pub mod dest_dir;
pub mod target_dir;
pub mod watch_spec;

pub use dest_dir::DestDir;
pub use target_dir::TargetDir;
pub use watch_spec::WatchSpec;
