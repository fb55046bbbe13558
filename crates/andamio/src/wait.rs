//! Wait options and polling helpers for test synchronization.

use crate::result::{AndamioError, AndamioResult};
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
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

// =============================================================================
// POLLING
// =============================================================================

/// Poll a predicate until it returns true or the options' timeout elapses
pub fn wait_for<F>(predicate: F, options: &WaitOptions) -> AndamioResult<()>
where
    F: Fn() -> bool,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    while start.elapsed() < timeout {
        if predicate() {
            return Ok(());
        }
        std::thread::sleep(poll_interval);
    }

    Err(AndamioError::Timeout {
        ms: options.timeout_ms,
    })
}

/// Wait for a condition with default polling and the given timeout
pub fn wait_until<F>(predicate: F, timeout_ms: u64) -> AndamioResult<()>
where
    F: Fn() -> bool,
{
    let options = WaitOptions::new().with_timeout(timeout_ms);
    wait_for(predicate, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(5000).with_poll_interval(10);
            assert_eq!(opts.timeout_ms, 5000);
            assert_eq!(opts.poll_interval_ms, 10);
        }

        #[test]
        fn test_wait_options_durations() {
            let opts = WaitOptions::new().with_timeout(5000).with_poll_interval(100);
            assert_eq!(opts.timeout(), Duration::from_millis(5000));
            assert_eq!(opts.poll_interval(), Duration::from_millis(100));
        }
    }

    mod polling_tests {
        use super::*;

        #[test]
        fn test_wait_for_immediate_success() {
            let options = WaitOptions::new().with_timeout(100).with_poll_interval(1);
            assert!(wait_for(|| true, &options).is_ok());
        }

        #[test]
        fn test_wait_for_eventual_success() {
            let counter = AtomicU32::new(0);
            let options = WaitOptions::new().with_timeout(5000).with_poll_interval(1);
            let result = wait_for(
                || counter.fetch_add(1, Ordering::SeqCst) >= 3,
                &options,
            );
            assert!(result.is_ok());
        }

        #[test]
        fn test_wait_for_timeout() {
            let options = WaitOptions::new().with_timeout(20).with_poll_interval(1);
            let result = wait_for(|| false, &options);
            assert!(matches!(result, Err(AndamioError::Timeout { ms: 20 })));
        }

        #[test]
        fn test_wait_until_success() {
            assert!(wait_until(|| true, 100).is_ok());
        }
    }
}
