// Context - Isolated browsing session
//
// A context maps to a CDP browser context: separate cookies and storage
// within the shared browser process. It carries the default action timeout
// applied to every locator action and assertion on its pages.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};

use crate::driver::SharedBrowser;
use crate::error::{Error, Result};
use crate::page::Page;

/// Default timeout for locator actions and assertions (5 seconds, fixed
/// for all scenarios; individual calls may override it).
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Isolated browsing session owned by a [`crate::Driver`].
#[derive(Debug)]
pub struct Context {
    browser: SharedBrowser,
    id: BrowserContextId,
    default_timeout: Duration,
    closed: bool,
}

impl Context {
    pub(crate) async fn create(browser: SharedBrowser) -> Result<Self> {
        let id = {
            let guard = browser.lock().await;
            let Some(b) = guard.as_ref() else {
                return Err(Error::Context("driver is not started".to_string()));
            };
            b.execute(CreateBrowserContextParams::default())
                .await?
                .result
                .browser_context_id
                .clone()
        };
        tracing::debug!("Created browsing context {:?}", id);

        Ok(Self {
            browser,
            id,
            default_timeout: DEFAULT_ACTION_TIMEOUT,
            closed: false,
        })
    }

    /// The default timeout pages created from this context inherit.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Override the default action timeout for pages created afterwards.
    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    /// Opens a fresh `about:blank` page bound to this context.
    pub async fn new_page(&self) -> Result<Page> {
        if self.closed {
            return Err(Error::Context("context is closed".to_string()));
        }

        let guard = self.browser.lock().await;
        let Some(b) = guard.as_ref() else {
            return Err(Error::Context("driver is not started".to_string()));
        };

        let mut params: CreateTargetParams = "about:blank".into();
        params.browser_context_id = Some(self.id.clone());
        let page = b.new_page(params).await?;

        Ok(Page::new(page, self.default_timeout))
    }

    /// Releases the session and every page it owns.
    ///
    /// Idempotent. If the driver already stopped, the context died with the
    /// browser and there is nothing left to dispose; that case is logged
    /// and swallowed so teardown can always run to completion.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let guard = self.browser.lock().await;
        let Some(b) = guard.as_ref() else {
            tracing::debug!("Context close after driver stop; nothing to dispose");
            return;
        };

        let params = DisposeBrowserContextParams::new(self.id.clone());
        if let Err(e) = b.execute(params).await {
            tracing::warn!("Error disposing browsing context: {}", e);
        } else {
            tracing::debug!("Disposed browsing context {:?}", self.id);
        }
    }
}
