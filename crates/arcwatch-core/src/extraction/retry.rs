//! Fixed-interval retry for locked sources.

use std::path::Path;
use std::thread;

use crate::ExtractionError;
use crate::Result;
use crate::RetryPolicy;

/// Runs `op` until it stops failing with
/// [`ExtractionError::LockedResource`], sleeping `policy.interval` between
/// attempts.
///
/// `op` receives the 1-based attempt number. Any error other than a lock is
/// returned immediately. Returns the value with the number of attempts used.
///
/// # Errors
///
/// Returns [`ExtractionError::RetriesExhausted`] once `policy.max_attempts`
/// attempts have all hit a lock, or the first non-lock error `op` returns.
///
/// # Examples
///
/// ```
/// use arcwatch_core::ExtractionError;
/// use arcwatch_core::RetryPolicy;
/// use arcwatch_core::extraction::retry::retry_on_lock;
/// use std::path::Path;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(5, Duration::ZERO);
/// let path = Path::new("game.zip");
/// let (value, attempts) = retry_on_lock(policy, path, |attempt| {
///     if attempt < 3 {
///         Err(ExtractionError::LockedResource { path: path.into() })
///     } else {
///         Ok("done")
///     }
/// })
/// .unwrap();
/// assert_eq!((value, attempts), ("done", 3));
/// ```
pub fn retry_on_lock<T, F>(policy: RetryPolicy, path: &Path, mut op: F) -> Result<(T, u32)>
where
    F: FnMut(u32) -> Result<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok((value, attempt)),
            Err(e) if e.is_transient_lock() => {
                if attempt >= max_attempts {
                    tracing::debug!(
                        "[retry] giving up on {} after {attempt} attempts",
                        path.display()
                    );
                    return Err(ExtractionError::RetriesExhausted {
                        path: path.to_path_buf(),
                        attempts: attempt,
                    });
                }
                tracing::debug!(
                    "[retry] {} locked (attempt {attempt}/{max_attempts}), waiting {:?}",
                    path.display(),
                    policy.interval
                );
                thread::sleep(policy.interval);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
