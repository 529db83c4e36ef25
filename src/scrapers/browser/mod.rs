//! Browser automation seam.
//!
//! The crawler only talks to a [`Driver`]. Elements are addressed by an
//! [`ElementLocator`] (CSS selector plus match index) that is resolved against
//! a DOM snapshot on our side and against `querySelectorAll` in the page, so
//! no live element handle ever crosses an await point.
//!
//! [`ChromeDriver`] drives a real Chromium over CDP (feature `browser`).

mod chrome;
mod config;
#[cfg(test)]
pub(crate) mod fake;
mod stealth;

pub use chrome::ChromeDriver;
pub use config::{default_headless, default_timeout, BrowserEngineConfig};

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::error::DriverError;

/// A DOM element addressed as `document.querySelectorAll(selector)[index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementLocator {
    pub selector: String,
    pub index: usize,
}

impl ElementLocator {
    pub fn first(selector: impl Into<String>) -> Self {
        Self::nth(selector, 0)
    }

    pub fn nth(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }

    /// JavaScript expression evaluating to the element (or `undefined`).
    pub fn js_expr(&self) -> String {
        let selector = serde_json::to_string(&self.selector).unwrap_or_else(|_| "''".to_string());
        format!("document.querySelectorAll({})[{}]", selector, self.index)
    }
}

/// Browser automation operations the crawler depends on.
#[async_trait]
pub trait Driver: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&mut self) -> Result<String, DriverError>;

    /// Serialized DOM of the current page.
    async fn page_source(&mut self) -> Result<String, DriverError>;

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError>;

    /// Script-driven click; works on offscreen elements. Returns `false` when
    /// the element does not exist.
    async fn click(&mut self, element: &ElementLocator) -> Result<bool, DriverError>;

    /// Replace the element's value with `text`.
    async fn fill(&mut self, element: &ElementLocator, text: &str) -> Result<(), DriverError>;

    /// Type `text` into the element and press Enter.
    async fn type_and_submit(
        &mut self,
        element: &ElementLocator,
        text: &str,
    ) -> Result<(), DriverError>;

    /// Scroll to the bottom and return the resulting document height.
    async fn scroll_to_bottom(&mut self) -> Result<u64, DriverError>;
}

/// Parse a CSS selector, logging and discarding invalid ones.
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!("Invalid selector '{}': {}", css, e);
            None
        }
    }
}

/// Whether `css` matches anything in `html`.
pub fn html_has(html: &str, css: &str) -> bool {
    let Some(selector) = parse_selector(css) else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}

/// Whitespace-collapsed text of the first element matching `css`, if non-empty.
pub fn text_of(html: &str, css: &str) -> Option<String> {
    let selector = parse_selector(css)?;
    let document = Html::parse_document(html);
    let element = document.select(&selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// First of `candidates` that matches something in `html`.
pub fn first_present(html: &str, candidates: &[String]) -> Option<ElementLocator> {
    let document = Html::parse_document(html);
    candidates.iter().find_map(|css| {
        let selector = parse_selector(css)?;
        document
            .select(&selector)
            .next()
            .map(|_| ElementLocator::first(css.clone()))
    })
}

/// Locate the first element matching `css` on the current page.
pub async fn locate(
    driver: &mut dyn Driver,
    css: &str,
) -> Result<Option<ElementLocator>, DriverError> {
    let html = driver.page_source().await?;
    Ok(html_has(&html, css).then(|| ElementLocator::first(css)))
}

/// Poll the page source until `ready` holds or `timeout` elapses.
///
/// Returns whether the condition was met. Always checks at least once.
pub async fn wait_until<F>(
    driver: &mut dyn Driver,
    timeout: Duration,
    poll: Duration,
    ready: F,
) -> Result<bool, DriverError>
where
    F: Fn(&str) -> bool + Send,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let html = driver.page_source().await?;
        if ready(&html) {
            return Ok(true);
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(poll).await;
    }
}

/// Wait for any of `selectors` to appear.
pub async fn wait_for_any(
    driver: &mut dyn Driver,
    selectors: &[String],
    timeout: Duration,
    poll: Duration,
) -> Result<bool, DriverError> {
    wait_until(driver, timeout, poll, |html| {
        selectors.iter().any(|css| html_has(html, css))
    })
    .await
}

/// Wait for `selector` to appear.
pub async fn wait_for(
    driver: &mut dyn Driver,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<bool, DriverError> {
    wait_until(driver, timeout, poll, |html| html_has(html, selector)).await
}

/// Scroll until the document height stops growing or `max_rounds` is hit.
pub async fn scroll_until_stable(
    driver: &mut dyn Driver,
    pause: Duration,
    max_rounds: usize,
) -> Result<(), DriverError> {
    let mut last_height = 0;
    for _ in 0..max_rounds {
        let height = driver.scroll_to_bottom().await?;
        if height == last_height {
            break;
        }
        last_height = height;
        tokio::time::sleep(pause).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::fake::FakeDriver;
    use super::*;

    #[test]
    fn test_js_expr_quotes_selector() {
        let loc = ElementLocator::nth("a[data-hook='see-all']", 3);
        assert_eq!(
            loc.js_expr(),
            r#"document.querySelectorAll("a[data-hook='see-all']")[3]"#
        );
    }

    #[test]
    fn test_html_has_and_first_present() {
        let html = r#"<div id="a"><input id="ap_email"></div>"#;
        assert!(html_has(html, "#ap_email"));
        assert!(!html_has(html, "#ap_password"));
        assert!(!html_has(html, "!!not a selector"));
        let found = first_present(html, &["#missing".into(), "div#a input".into()]);
        assert_eq!(found, Some(ElementLocator::first("div#a input")));
    }

    #[test]
    fn test_text_of_collapses_whitespace() {
        let html = "<span id='productTitle'>\n   Fresh   Scent\n Detergent </span><p id='e'> </p>";
        assert_eq!(
            text_of(html, "#productTitle").as_deref(),
            Some("Fresh Scent Detergent")
        );
        assert_eq!(text_of(html, "#e"), None);
        assert_eq!(text_of(html, "#missing"), None);
    }

    #[tokio::test]
    async fn test_wait_for_times_out_without_error() {
        let mut driver = FakeDriver::new().page("https://x.test/", "<p>empty</p>");
        driver.navigate("https://x.test/").await.unwrap();
        let found = wait_for(
            &mut driver,
            "#never",
            Duration::from_millis(10),
            Duration::from_millis(1),
        )
        .await
        .unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_wait_for_sees_later_snapshot() {
        let mut driver = FakeDriver::new()
            .page("https://x.test/", "<p>loading</p>")
            .then("https://x.test/", "<ul id='list'></ul>");
        driver.navigate("https://x.test/").await.unwrap();
        let found = wait_for(
            &mut driver,
            "#list",
            Duration::from_millis(200),
            Duration::from_millis(1),
        )
        .await
        .unwrap();
        assert!(found);
    }
}
