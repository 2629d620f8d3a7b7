// Error types for atende-e2e-core

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the browser
#[derive(Debug, Error)]
pub enum Error {
    /// Browser engine could not be launched
    ///
    /// The Chromium executable was unavailable or the launch configuration
    /// was rejected. Set `E2E_CHROME` to point at a Chromium install.
    #[error("Failed to launch browser: {0}. Check that Chromium is installed (or set E2E_CHROME).")]
    Launch(String),

    /// Browsing-context lifecycle misuse
    ///
    /// Raised when a context or page is requested from a driver that was
    /// never started or has already been stopped.
    #[error("Browsing context error: {0}")]
    Context(String),

    /// Navigation timeout
    ///
    /// Navigation did not commit within the allowed time. Includes the URL
    /// being navigated to and the timeout that elapsed.
    #[error("Navigation timeout after {duration_ms}ms navigating to '{url}'")]
    NavigationTimeout { url: String, duration_ms: u64 },

    /// Navigation failure other than a timeout
    ///
    /// Network failure, or a bounded URL expectation that never held
    /// (the message names the route fragment that did not appear).
    #[error("Navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    /// Element never became actionable
    ///
    /// No element matching the selector became present and visible within
    /// the wait budget of a fill or click.
    #[error("Timed out after {duration_ms}ms waiting for '{selector}' to become actionable")]
    ActionTimeout { selector: String, duration_ms: u64 },

    /// Expected page state was absent
    ///
    /// The message names the specific expectation that was not met
    /// (expected text, expected URL fragment).
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Browser protocol error surfaced by the engine
    #[error("Browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// I/O error (failure-artifact writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_timeout_names_url_and_duration() {
        let err = Error::NavigationTimeout {
            url: "http://localhost:3001".to_string(),
            duration_ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("10000ms"));
        assert!(msg.contains("http://localhost:3001"));
    }

    #[test]
    fn action_timeout_names_selector() {
        let err = Error::ActionTimeout {
            selector: "text=Email enviado".to_string(),
            duration_ms: 5000,
        };
        assert!(err.to_string().contains("text=Email enviado"));
    }
}
