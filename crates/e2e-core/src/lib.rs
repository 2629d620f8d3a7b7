//! atende-e2e-core: browser harness for Atende end-to-end flows
//!
//! Thin, explicitly-owned wrapper over a headless Chromium (driven through
//! the DevTools protocol) for the generated user-journey scenarios: driver
//! and context lifecycle, lazy locators with actionability waits, retrying
//! visibility assertions, and a runner that guarantees teardown.
//!
//! # Example
//!
//! ```ignore
//! use std::process::ExitCode;
//! use atende_e2e_core::{expect, runner, GotoOptions, Page, Result, Scenario};
//!
//! async fn flow(page: Page) -> Result<()> {
//!     page.goto("http://localhost:3001", GotoOptions::commit()).await?;
//!     page.locator("text=Entrar na Plataforma").click().await?;
//!     expect(page.locator("text=Bem-vindo")).to_be_visible().await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> ExitCode {
//!     runner::run(Scenario::new("smoke"), flow).await
//! }
//! ```
//!
//! Ownership is explicit throughout: the runner constructs the driver,
//! context and page and threads them through the scenario; there are no
//! ambient singletons, and teardown runs in reverse acquisition order on
//! every path.

pub mod assertions;
pub mod context;
pub mod driver;
pub mod error;
pub mod locator;
pub mod page;
pub mod runner;

// Re-export error types
pub use error::{Error, Result};

// Re-export lifecycle handles
pub use context::{Context, DEFAULT_ACTION_TIMEOUT};
pub use driver::{DEFAULT_VIEWPORT, Driver, LaunchOptions};

// Re-export page and locator APIs
pub use locator::{Locator, Selector};
pub use page::{DEFAULT_NAVIGATION_TIMEOUT, GotoOptions, Page, WaitUntil};

// Re-export assertions API
pub use assertions::{Expectation, expect};

// Re-export runner entry points
pub use runner::{Expected, Scenario, Verdict, run};
