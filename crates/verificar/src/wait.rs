//! Wait mechanisms: bounded polling until a condition holds.
//!
//! Every expectation in a verification run blocks until its condition is
//! observed or a timeout elapses. The poll loop is the only suspension
//! point in the runner, and it is always bounded.

use crate::result::{VerifyError, VerifyResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a successful wait operation
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a wait result
    #[must_use]
    pub fn new(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

/// Poll `check` until it returns `true` or `options.timeout` elapses.
///
/// Evaluation errors from `check` propagate immediately; they are real
/// failures, not "condition not yet met".
///
/// # Errors
///
/// Returns [`VerifyError::ExpectationTimeout`] naming `description` if
/// the condition never holds within the wait budget.
pub async fn poll_until<F, Fut>(
    options: &WaitOptions,
    description: &str,
    mut check: F,
) -> VerifyResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VerifyResult<bool>>,
{
    let start = Instant::now();
    loop {
        if check().await? {
            return Ok(WaitResult::new(start.elapsed(), description));
        }
        if start.elapsed() >= options.timeout() {
            return Err(VerifyError::ExpectationTimeout {
                description: description.to_string(),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}
