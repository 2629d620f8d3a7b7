// Driver - Browser process lifecycle
//
// Owns the Chromium child process and the CDP event-handler task. Nothing
// else in the harness spawns a browser; contexts and pages are created
// through this handle.

use std::path::PathBuf;
use std::sync::Arc;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::context::Context;
use crate::error::{Error, Result};

/// Viewport used by every scenario.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

/// Flags the generated flows always launch with. `/dev/shm` is tiny in
/// containers, and the single-process/host-IPC pair keeps Chromium stable
/// under CI resource limits.
const CONTAINER_ARGS: &[&str] = &["--disable-dev-shm-usage", "--ipc=host", "--single-process"];

/// Shared handle to the (possibly already stopped) browser process.
///
/// `None` means the driver was stopped or never finished starting; every
/// consumer treats that as a lifecycle error rather than panicking.
pub(crate) type SharedBrowser = Arc<Mutex<Option<Browser>>>;

/// Options for launching the browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,

    /// Viewport size in pixels
    pub viewport: (u32, u32),

    /// Additional arguments for the browser process
    pub args: Vec<String>,

    /// Path to a specific Chromium executable
    pub executable: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: DEFAULT_VIEWPORT,
            args: CONTAINER_ARGS.iter().map(|s| s.to_string()).collect(),
            executable: None,
        }
    }
}

impl LaunchOptions {
    /// Creates options with the scenario defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus local-run overrides: `E2E_CHROME` selects the
    /// executable, `E2E_HEADFUL` (any value) disables headless mode.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(path) = std::env::var("E2E_CHROME") {
            options.executable = Some(PathBuf::from(path));
        }
        if std::env::var("E2E_HEADFUL").is_ok() {
            options.headless = false;
        }
        options
    }

    /// Run in headless mode
    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = enabled;
        self
    }

    /// Set the viewport size
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Append an extra browser argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the path to the browser executable
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    fn into_config(self) -> Result<BrowserConfig> {
        let (width, height) = self.viewport;
        // Sandboxing is off for the same reason the container flags are on:
        // these flows run as root inside CI containers.
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(width, height)
            .args(self.args);

        if !self.headless {
            builder = builder.with_head();
        }

        if let Some(path) = self.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(Error::Launch)
    }
}

/// Handle to a running browser process.
///
/// Created with [`Driver::start`]; hand out isolated sessions with
/// [`Driver::new_context`] and shut everything down with [`Driver::stop`].
#[derive(Debug)]
pub struct Driver {
    browser: SharedBrowser,
    handler: Option<JoinHandle<()>>,
}

impl Driver {
    /// Launches the browser process.
    ///
    /// Fails with [`Error::Launch`] when the executable is unavailable or
    /// the configuration is rejected. On success a background task drains
    /// CDP events until the connection closes.
    pub async fn start(options: LaunchOptions) -> Result<Self> {
        let config = options.into_config()?;

        tracing::debug!("Launching browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Arc::new(Mutex::new(Some(browser))),
            handler: Some(handle),
        })
    }

    /// Creates an isolated browsing session from this driver.
    ///
    /// Fails with [`Error::Context`] if the driver has been stopped.
    pub async fn new_context(&self) -> Result<Context> {
        Context::create(self.browser.clone()).await
    }

    /// Stops the browser process.
    ///
    /// Safe to call after a partial start, after owned contexts were
    /// closed, and more than once; later calls are no-ops. Shutdown
    /// problems are logged, never raised.
    pub async fn stop(&mut self) {
        let mut slot = self.browser.lock().await;
        if let Some(mut browser) = slot.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!("Error closing browser: {}", e);
            }
        }
        drop(slot);

        if let Some(handle) = self.handler.take() {
            handle.abort();
        }
        tracing::debug!("Browser stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_container_flags_and_viewport() {
        let options = LaunchOptions::default();
        assert!(options.headless);
        assert_eq!(options.viewport, (1280, 720));
        for flag in CONTAINER_ARGS {
            assert_eq!(
                options.args.iter().filter(|a| a.as_str() == *flag).count(),
                1,
                "flag {flag} should appear exactly once"
            );
        }
    }

    #[test]
    fn builder_appends_args_without_clobbering_defaults() {
        let options = LaunchOptions::new().arg("--lang=pt-BR").headless(false);
        assert!(!options.headless);
        assert!(options.args.iter().any(|a| a == "--lang=pt-BR"));
        assert!(options.args.iter().any(|a| a == "--disable-dev-shm-usage"));
    }

    #[test]
    fn executable_override_is_kept() {
        let options = LaunchOptions::new().executable("/usr/bin/chromium");
        assert_eq!(
            options.executable,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
    }
}
