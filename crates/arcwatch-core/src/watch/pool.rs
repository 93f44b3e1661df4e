//! Fixed-size worker pool running extraction tasks.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use crossbeam_channel::unbounded;

use crate::ExtractionTask;
use crate::Extractor;
use crate::WatchError;
use crate::sink::SharedSink;

/// Submission side of the pool's queue.
///
/// Closing is idempotent; once closed every submission is refused.
#[derive(Debug)]
pub struct Intake {
    sender: Mutex<Option<Sender<ExtractionTask>>>,
}

impl Intake {
    /// Queues `task` without blocking. Returns `false` once closed.
    pub fn submit(&self, task: ExtractionTask) -> bool {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_some_and(|sender| sender.send(task).is_ok())
    }

    /// `false` once [`Intake::close`] was called.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stops accepting tasks. Already queued tasks stay queued.
    pub fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Worker threads pulling from an unbounded queue.
#[derive(Debug)]
pub struct WorkerPool {
    intake: Arc<Intake>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `workers` threads (at least one) that run tasks with
    /// `extractor` and report to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::WorkerSpawn`] if a thread cannot be spawned.
    /// Workers spawned before the failure exit on their own.
    pub fn start(
        workers: usize,
        extractor: Arc<Extractor>,
        sink: SharedSink,
    ) -> Result<Self, WatchError> {
        let (sender, receiver) = unbounded::<ExtractionTask>();

        let workers = (0..workers.max(1))
            .map(|id| {
                let receiver = receiver.clone();
                let extractor = Arc::clone(&extractor);
                let sink = Arc::clone(&sink);

                thread::Builder::new()
                    .name(format!("arcwatch-worker-{id}"))
                    .spawn(move || {
                        for mut task in receiver {
                            tracing::debug!(
                                "[pool] worker {id} picked up {}",
                                task.event().source_path.display()
                            );
                            // Failures are already reported to the sink.
                            let _ = task.run(&extractor, sink.as_ref());
                        }
                        tracing::debug!("[pool] worker {id} exiting");
                    })
                    .map_err(|e| WatchError::WorkerSpawn(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            intake: Arc::new(Intake {
                sender: Mutex::new(Some(sender)),
            }),
            workers,
        })
    }

    /// Shared handle for submitting tasks.
    #[must_use]
    pub fn intake(&self) -> Arc<Intake> {
        Arc::clone(&self.intake)
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Closes the queue; workers finish what is queued, then exit.
    #[must_use = "call Drain::wait to block until queued tasks finish"]
    pub fn shutdown(self) -> Drain {
        self.intake.close();
        Drain {
            workers: self.workers,
        }
    }
}

/// Remaining work after a pool was shut down.
#[derive(Debug)]
pub struct Drain {
    workers: Vec<JoinHandle<()>>,
}

impl Drain {
    /// Returns `true` once every worker has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }

    /// Blocks until all queued and running tasks are done.
    pub fn wait(self) {
        for worker in self.workers {
            let name = worker.thread().name().unwrap_or("worker").to_owned();
            if worker.join().is_err() {
                tracing::warn!("[pool] {name} panicked");
            }
        }
    }
}
