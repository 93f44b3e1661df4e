//! Retry and watch configuration.

use std::time::Duration;

/// Bounded fixed-interval retry for files that are still locked.
///
/// # Examples
///
/// ```
/// use arcwatch_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 360);
/// assert_eq!(policy.total_budget(), Duration::from_secs(1800));
///
/// let quick = RetryPolicy::new(3, Duration::from_millis(10));
/// assert_eq!(quick.total_budget(), Duration::from_millis(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of lock failures tolerated before giving up.
    pub max_attempts: u32,

    /// Wait between two attempts.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Default number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 360;

    /// Default wait between attempts.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// Creates a policy; `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    /// Worst-case time spent waiting on a locked file.
    #[must_use]
    pub fn total_budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for RetryPolicy {
    /// 360 attempts, 5 seconds apart (30 minutes).
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_INTERVAL)
    }
}

/// Options for a running watch.
///
/// # Examples
///
/// ```
/// use arcwatch_core::WatchOptions;
///
/// let options = WatchOptions {
///     workers: 2,
///     ..Default::default()
/// };
/// assert_eq!(options.workers, 2);
/// ```
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Retry policy applied to every extraction task.
    pub retry: RetryPolicy,

    /// Number of extraction workers; at most this many tasks run at once.
    pub workers: usize,
}

impl Default for WatchOptions {
    /// One worker per CPU, default retry policy.
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            workers: num_cpus::get().max(1),
        }
    }
}

impl WatchOptions {
    /// Sets the worker count (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
