// Locator - Lazy element selector with actionability waits
//
// A locator is a deferred reference: nothing is resolved until an action
// consumes it, and every action re-evaluates the selector from scratch.
// A locator may carry several candidate selectors in priority order; the
// consuming action uses the first one that currently resolves. That models
// the fallback chains the generated flows rely on when the app's markup is
// unstable, without turning them into a generic retry policy.

use std::fmt;
use std::time::{Duration, Instant};

use chromiumoxide::element::Element;

use crate::error::{Error, Result};
use crate::page::Page;

/// Polling interval for actionability and visibility waits.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// JS predicate evaluated on a candidate element before acting on it.
const VISIBLE_JS: &str = r#"function() {
    const style = window.getComputedStyle(this);
    if (style.display === 'none' || style.visibility === 'hidden') return false;
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}"#;

/// Clears an input's current value so fill() replaces instead of appends.
const CLEAR_JS: &str = r#"function() {
    if ('value' in this) {
        this.value = '';
        this.dispatchEvent(new Event('input', { bubbles: true }));
    }
}"#;

/// One way of finding an element on the page.
///
/// The generated flows use structural XPath selectors (`xpath=` prefix or a
/// leading `/`) and visible-text selectors (`text=` prefix); anything else
/// is treated as CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// Structural (path-based) XPath selector
    XPath(String),
    /// First element with a matching visible text node
    Text(String),
}

impl Selector {
    /// Parses the selector syntax used by the scenario scripts.
    pub fn parse(raw: &str) -> Selector {
        if let Some(query) = raw.strip_prefix("xpath=") {
            Selector::XPath(query.to_string())
        } else if raw.starts_with('/') || raw.starts_with("(/") {
            Selector::XPath(raw.to_string())
        } else if let Some(text) = raw.strip_prefix("text=") {
            Selector::Text(text.to_string())
        } else {
            Selector::Css(raw.to_string())
        }
    }

    /// XPath matching elements with a text node containing `text`.
    ///
    /// Matching on direct text nodes keeps the match on the leaf element
    /// instead of every ancestor that also "contains" the text.
    fn text_xpath(text: &str) -> String {
        format!("//*[text()[contains(., {})]]", xpath_string_literal(text))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "{css}"),
            Selector::XPath(query) => write!(f, "xpath={query}"),
            Selector::Text(text) => write!(f, "text={text}"),
        }
    }
}

/// Quotes `text` as an XPath string literal.
///
/// XPath 1.0 has no escape sequences, so text containing both quote kinds
/// has to be stitched together with concat().
fn xpath_string_literal(text: &str) -> String {
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let parts: Vec<String> = text
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// Deferred reference to the first element matching one of the candidate
/// selectors, resolved anew by each consuming action.
#[derive(Clone)]
pub struct Locator {
    page: Page,
    candidates: Vec<Selector>,
    timeout: Duration,
}

impl Locator {
    pub(crate) fn new(page: Page, candidates: Vec<Selector>) -> Self {
        let timeout = page.default_timeout();
        Self {
            page,
            candidates,
            timeout,
        }
    }

    /// Action/assertion timeout inherited from the page.
    pub(crate) fn page_timeout(&self) -> Duration {
        self.timeout
    }

    /// Human-readable form of the candidate list, for error messages.
    pub fn describe(&self) -> String {
        self.candidates
            .iter()
            .map(Selector::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Single resolution pass over the candidates, in order.
    async fn resolve_once(&self) -> Option<Element> {
        for selector in &self.candidates {
            let found = match selector {
                Selector::Css(css) => self.page.cdp().find_element(css.as_str()).await.ok(),
                Selector::XPath(query) => self.page.cdp().find_xpath(query.as_str()).await.ok(),
                Selector::Text(text) => self
                    .page
                    .cdp()
                    .find_xpath(Selector::text_xpath(text))
                    .await
                    .ok(),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Whether some candidate currently resolves to a visible element.
    ///
    /// Never errors on "no match" - a locator with zero matches is a valid
    /// state, it just is not visible yet.
    pub async fn is_visible(&self) -> bool {
        match self.resolve_once().await {
            Some(element) => element_visible(&element).await,
            None => false,
        }
    }

    /// Waits until a candidate resolves to a visible element.
    async fn wait_actionable(&self, timeout: Duration) -> Result<Element> {
        let start = Instant::now();
        loop {
            if let Some(element) = self.resolve_once().await {
                if element_visible(&element).await {
                    return Ok(element);
                }
            }

            if start.elapsed() >= timeout {
                return Err(Error::ActionTimeout {
                    selector: self.describe(),
                    duration_ms: timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Clicks the first actionable candidate, waiting up to the page's
    /// default action timeout.
    pub async fn click(&self) -> Result<()> {
        self.click_with_timeout(self.timeout).await
    }

    /// Clicks with an explicit actionability-wait budget.
    pub async fn click_with_timeout(&self, timeout: Duration) -> Result<()> {
        let element = self.wait_actionable(timeout).await?;
        element.click().await?;
        tracing::debug!("Clicked '{}'", self.describe());
        Ok(())
    }

    /// Replaces the element's text with `text`, waiting up to the page's
    /// default action timeout for it to become actionable.
    pub async fn fill(&self, text: &str) -> Result<()> {
        self.fill_with_timeout(text, self.timeout).await
    }

    /// Fills with an explicit actionability-wait budget.
    pub async fn fill_with_timeout(&self, text: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_actionable(timeout).await?;
        // Click to focus, clear any prefilled value, then type.
        element.click().await?;
        element.call_js_fn(CLEAR_JS, false).await?;
        element.type_str(text).await?;
        tracing::debug!("Filled '{}' ({} chars)", self.describe(), text.len());
        Ok(())
    }
}

async fn element_visible(element: &Element) -> bool {
    match element.call_js_fn(VISIBLE_JS, false).await {
        Ok(ret) => ret
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_xpath_prefix() {
        let selector = Selector::parse("xpath=/html/body/div[1]/form/button");
        assert_eq!(
            selector,
            Selector::XPath("/html/body/div[1]/form/button".to_string())
        );
    }

    #[test]
    fn parses_bare_path_as_xpath() {
        assert_eq!(
            Selector::parse("/html/body/div[1]/div/a"),
            Selector::XPath("/html/body/div[1]/div/a".to_string())
        );
    }

    #[test]
    fn parses_text_prefix() {
        assert_eq!(
            Selector::parse("text=Email enviado"),
            Selector::Text("Email enviado".to_string())
        );
    }

    #[test]
    fn everything_else_is_css() {
        assert_eq!(
            Selector::parse("form input[type=email]"),
            Selector::Css("form input[type=email]".to_string())
        );
    }

    #[test]
    fn display_round_trips_prefixes() {
        for raw in ["xpath=/html/body/a", "text=Status", "button.primary"] {
            assert_eq!(Selector::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn text_xpath_targets_direct_text_nodes() {
        let xpath = Selector::text_xpath("Verifique sua caixa de entrada");
        assert_eq!(
            xpath,
            "//*[text()[contains(., \"Verifique sua caixa de entrada\")]]"
        );
    }

    #[test]
    fn xpath_literal_handles_quotes() {
        assert_eq!(xpath_string_literal("plain"), "\"plain\"");
        assert_eq!(xpath_string_literal("it's"), "\"it's\"");
        assert_eq!(xpath_string_literal("a \"b\""), "'a \"b\"'");
        assert_eq!(
            xpath_string_literal("a\"b'c"),
            "concat(\"a\", '\"', \"b'c\")"
        );
    }
}
