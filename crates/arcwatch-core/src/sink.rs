//! Append-only sinks for human-readable task progress.
//!
//! Every extraction task receives an [`Arc<dyn LogSink>`](SharedSink) at
//! creation. Implementations must accept concurrent calls and never
//! interleave two lines.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

/// Destination for operational log lines.
pub trait LogSink: Send + Sync {
    /// Appends one line. Must be atomic per call.
    fn append(&self, line: &str);
}

/// Shared handle passed to every task.
pub type SharedSink = Arc<dyn LogSink>;

/// Forwards lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn append(&self, line: &str) {
        tracing::info!(target: "arcwatch", "{line}");
    }
}

/// Collects lines in memory.
///
/// # Examples
///
/// ```
/// use arcwatch_core::sink::LogSink;
/// use arcwatch_core::sink::MemorySink;
///
/// let sink = MemorySink::new();
/// sink.append("New file detected: game.zip");
/// assert_eq!(sink.lines(), vec!["New file detected: game.zip".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line appended so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of lines containing `needle`.
    #[must_use]
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}

/// Appends lines to a log file, one `write_all` per line.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = file.write_all(record.as_bytes()) {
            tracing::warn!("[sink] failed to append to log file: {e}");
        }
    }
}

/// Sends each line to every inner sink in order.
pub struct FanoutSink {
    sinks: Vec<SharedSink>,
}

impl FanoutSink {
    /// Creates a sink that duplicates lines to `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<SharedSink>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanoutSink {
    fn append(&self, line: &str) {
        for sink in &self.sinks {
            sink.append(line);
        }
    }
}
