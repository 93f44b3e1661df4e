//! Starting and stopping a watch.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use notify::Event;
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify::Watcher;

use crate::ArchiveEvent;
use crate::ExtractionTask;
use crate::Extractor;
use crate::WatchError;
use crate::WatchOptions;
use crate::sink::SharedSink;
use crate::types::WatchSpec;

use super::listener::FileCreatedListener;
use super::listener::route;
use super::pool::Drain;
use super::pool::Intake;
use super::pool::WorkerPool;

/// A running watch. Dropping it without [`WatchHandle::stop`] unsubscribes
/// and lets the workers finish in the background.
pub struct WatchHandle {
    spec: WatchSpec,
    watcher: RecommendedWatcher,
    pool: WorkerPool,
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("spec", &self.spec)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl WatchHandle {
    /// What is being watched.
    #[must_use]
    pub const fn spec(&self) -> &WatchSpec {
        &self.spec
    }

    /// Unsubscribes from notifications and closes the task queue.
    ///
    /// Tasks already queued or running keep going; use [`Drain::wait`] to
    /// block until they are done.
    #[must_use = "call Drain::wait to block until queued tasks finish"]
    pub fn stop(self) -> Drain {
        let Self { spec, watcher, pool } = self;
        drop(watcher);
        tracing::debug!("[watch] stopped watching {}", spec.source_root().display());
        pool.shutdown()
    }
}

/// Turns new-file notifications into queued extraction tasks.
struct Dispatcher {
    intake: Arc<Intake>,
    destination_root: PathBuf,
    sink: SharedSink,
}

impl FileCreatedListener for Dispatcher {
    fn on_file_created(&self, path: &Path) {
        if !self.intake.is_open() {
            return;
        }
        self.sink.append(&format!("New file detected: {}", path.display()));

        let task = ExtractionTask::new(ArchiveEvent::new(path), &self.destination_root);
        if !self.intake.submit(task) {
            tracing::debug!("[watch] queue closed, dropping {}", path.display());
        }
    }
}

/// Watches `spec.source_root()` recursively and extracts every archive that
/// appears into `spec.destination_root()`.
///
/// Returns as soon as the subscription is active; extraction happens on
/// `options.workers` background threads.
///
/// # Errors
///
/// Returns [`WatchError::WorkerSpawn`] if the worker threads cannot be
/// started, or [`WatchError::Notify`] if the notification backend cannot
/// watch the source root.
///
/// # Examples
///
/// ```no_run
/// use arcwatch_core::WatchOptions;
/// use arcwatch_core::WatchSpec;
/// use arcwatch_core::sink::TracingSink;
/// use arcwatch_core::start_watch;
/// use arcwatch_core::stop_watch;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = WatchSpec::new("/games/Crackpipe/Downloads", "/games/Crackpipe/Installations")?;
/// let handle = start_watch(spec, &WatchOptions::default(), Arc::new(TracingSink))?;
/// // ...
/// stop_watch(handle).wait();
/// # Ok(())
/// # }
/// ```
pub fn start_watch(
    spec: WatchSpec,
    options: &WatchOptions,
    sink: SharedSink,
) -> Result<WatchHandle, WatchError> {
    let extractor = Extractor::new().with_retry(options.retry);
    start_watch_with(spec, options.workers, extractor, sink)
}

/// Like [`start_watch`], running tasks with a caller-built `extractor`
/// (custom [`SourceOpener`](crate::SourceOpener) or retry policy).
///
/// # Errors
///
/// See [`start_watch`].
pub fn start_watch_with(
    spec: WatchSpec,
    workers: usize,
    extractor: Extractor,
    sink: SharedSink,
) -> Result<WatchHandle, WatchError> {
    let pool = WorkerPool::start(workers, Arc::new(extractor), Arc::clone(&sink))?;

    let dispatcher = Dispatcher {
        intake: pool.intake(),
        destination_root: spec.destination_root().to_path_buf(),
        sink,
    };

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => route(&event, &dispatcher),
        Err(e) => tracing::warn!("[watch] file watch error: {e}"),
    })?;
    watcher.watch(spec.source_root(), RecursiveMode::Recursive)?;

    tracing::debug!(
        "[watch] watching {} with {} workers",
        spec.source_root().display(),
        pool.worker_count()
    );

    Ok(WatchHandle {
        spec,
        watcher,
        pool,
    })
}

/// Stops `handle`. Same as [`WatchHandle::stop`].
#[must_use = "call Drain::wait to block until queued tasks finish"]
pub fn stop_watch(handle: WatchHandle) -> Drain {
    handle.stop()
}
