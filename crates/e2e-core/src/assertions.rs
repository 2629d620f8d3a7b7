// Assertions - Auto-retry visibility checks
//
// expect() polls until the expectation holds or the budget elapses, so the
// scenarios never need fixed sleeps in front of their checks.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::locator::Locator;

/// Default polling interval for assertions (100ms)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Creates an expectation for a locator with auto-retry behavior.
///
/// The timeout defaults to the locator's page-level action timeout; use
/// [`Expectation::with_timeout`] for per-check budgets.
pub fn expect(locator: Locator) -> Expectation {
    Expectation::new(locator)
}

/// Expectation wraps a locator and provides assertions with auto-retry.
pub struct Expectation {
    locator: Locator,
    timeout: Duration,
    poll_interval: Duration,
}

impl Expectation {
    pub(crate) fn new(locator: Locator) -> Self {
        let timeout = locator.page_timeout();
        Self {
            locator,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets a custom timeout for this assertion.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom poll interval for this assertion.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Asserts that the located element becomes visible.
    ///
    /// Retries until the element is visible or the timeout elapses; the
    /// failure message names the expectation that was not met.
    pub async fn to_be_visible(self) -> Result<()> {
        let start = Instant::now();

        loop {
            if self.locator.is_visible().await {
                return Ok(());
            }

            if start.elapsed() >= self.timeout {
                return Err(Error::Assertion(format!(
                    "expected '{}' to be visible, but it was not after {:?}",
                    self.locator.describe(),
                    self.timeout
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
