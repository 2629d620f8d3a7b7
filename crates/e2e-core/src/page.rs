// Page - A single navigable document
//
// Thin handle over the engine page: navigation with wait policies, locator
// construction, URL reads, and the unconditional pause the scenario
// contract keeps around. The handle is cheap to clone; the runner keeps a
// clone for failure screenshots while the scenario drives its own.

use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;

use crate::error::{Error, Result};
use crate::locator::{Locator, POLL_INTERVAL, Selector};

/// Navigation timeout used by every scenario (10 seconds).
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_millis(10_000);

/// When a navigation is considered finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Return as soon as the navigation is committed; do not wait for the
    /// document to finish loading.
    Commit,
    /// Wait for the load lifecycle event.
    Load,
}

/// Options for [`Page::goto`]
#[derive(Debug, Clone)]
pub struct GotoOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
}

impl Default for GotoOptions {
    fn default() -> Self {
        Self {
            wait_until: WaitUntil::Load,
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
        }
    }
}

impl GotoOptions {
    /// The policy every scenario uses: commit wait, 10 s budget.
    pub fn commit() -> Self {
        Self {
            wait_until: WaitUntil::Commit,
            ..Self::default()
        }
    }

    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A single navigable document bound to a [`crate::Context`].
#[derive(Clone, Debug)]
pub struct Page {
    inner: chromiumoxide::Page,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: chromiumoxide::Page, default_timeout: Duration) -> Self {
        Self {
            inner,
            default_timeout,
        }
    }

    pub(crate) fn cdp(&self) -> &chromiumoxide::Page {
        &self.inner
    }

    /// Default actionability/assertion timeout inherited from the context.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Navigates to `url`.
    ///
    /// With [`WaitUntil::Commit`] this returns once the navigation is
    /// committed (the engine's navigate call resolves on commit); with
    /// [`WaitUntil::Load`] it additionally waits for the page to finish
    /// loading. Fails with [`Error::NavigationTimeout`] when the budget
    /// elapses and [`Error::Navigation`] on network failure.
    pub async fn goto(&self, url: &str, options: GotoOptions) -> Result<()> {
        tracing::debug!("Navigating to {} ({:?})", url, options.wait_until);

        let navigate = async {
            self.inner.goto(url).await?;
            if options.wait_until == WaitUntil::Load {
                self.inner.wait_for_navigation().await?;
            }
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(options.timeout, navigate).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(Error::NavigationTimeout {
                url: url.to_string(),
                duration_ms: options.timeout.as_millis() as u64,
            }),
        }
    }

    /// Lazy handle to the first element matching `selector`.
    ///
    /// Resolution is deferred to the consuming action; a selector with no
    /// current match is not an error here.
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(self.clone(), vec![Selector::parse(selector)])
    }

    /// Ordered-candidate locator: the consuming action uses the first
    /// selector that resolves. Candidate order is preserved.
    pub fn locator_any<'a>(&self, selectors: impl IntoIterator<Item = &'a str>) -> Locator {
        let candidates = selectors.into_iter().map(Selector::parse).collect();
        Locator::new(self.clone(), candidates)
    }

    /// The page's current address, for substring assertions.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.inner.url().await?.unwrap_or_default())
    }

    /// Polls until the current URL contains `fragment`.
    ///
    /// Bounded replacement for the fixed sleep-then-assert the generated
    /// flows used after form submits. Fails with [`Error::Navigation`]
    /// naming the missing fragment.
    pub async fn wait_for_url_contains(&self, fragment: &str, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let url = self.current_url().await?;
            if url.contains(fragment) {
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(Error::Navigation {
                    url,
                    message: format!(
                        "expected URL to contain '{}' within {}ms",
                        fragment,
                        timeout.as_millis()
                    ),
                });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Unconditional scheduling delay.
    ///
    /// Not a synchronization primitive; prefer the bounded waits. Kept for
    /// parity with the page contract the scenarios were generated against.
    pub async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Captures a PNG of the current viewport.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let bytes = self
            .inner
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_policy_keeps_navigation_budget() {
        let options = GotoOptions::commit();
        assert_eq!(options.wait_until, WaitUntil::Commit);
        assert_eq!(options.timeout, DEFAULT_NAVIGATION_TIMEOUT);
    }

    #[test]
    fn goto_options_builder_overrides() {
        let options = GotoOptions::default()
            .wait_until(WaitUntil::Commit)
            .timeout(Duration::from_secs(3));
        assert_eq!(options.wait_until, WaitUntil::Commit);
        assert_eq!(options.timeout, Duration::from_secs(3));
    }
}
