//! Recursive watching of the source tree.
//!
//! A notify subscription feeds [`listener::new_file_paths`]; each qualifying
//! path becomes an [`ExtractionTask`](crate::ExtractionTask) on the worker
//! pool's queue.

pub mod dispatcher;
pub mod listener;
pub mod pool;

pub use dispatcher::WatchHandle;
pub use dispatcher::start_watch;
pub use dispatcher::start_watch_with;
pub use dispatcher::stop_watch;
pub use listener::FileCreatedListener;
pub use pool::Drain;
