//! Scripted in-memory driver for exercising crawl flows without a browser.
//!
//! Pages are HTML snapshots keyed by URL; a key also serves every URL it is a
//! prefix of (longest key wins). A page may hold several snapshots: each read
//! of the page source consumes one until only the last remains, which then
//! repeats. Clicks and searches are routed to URLs by selector and text.
//! A redirect can divert one specific visit of a URL elsewhere, e.g. back to
//! the sign-in page once a session has lapsed.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;

use super::{html_has, Driver, ElementLocator};
use crate::scrapers::error::DriverError;

const ANY_PAGE: &str = "*";

#[derive(Debug, Default)]
pub struct FakeDriver {
    pages: HashMap<String, VecDeque<String>>,
    clicks: HashMap<(String, String), String>,
    searches: HashMap<String, String>,
    failing: HashSet<String>,
    redirects: HashMap<String, (usize, String)>,
    visits: HashMap<String, usize>,
    current: String,
    pub navigations: Vec<String>,
    pub clicked: Vec<ElementLocator>,
    pub filled: Vec<(String, String)>,
    pub submitted: Vec<(String, String)>,
    pub scripts: Vec<String>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url` (and URLs it prefixes).
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), VecDeque::from([html.to_string()]));
        self
    }

    /// Queue another snapshot for `url`, shown after the earlier ones are read.
    pub fn then(mut self, url: &str, html: &str) -> Self {
        self.pages
            .entry(url.to_string())
            .or_default()
            .push_back(html.to_string());
        self
    }

    /// Clicking `selector` while on a page under `from` (or anywhere, with
    /// `"*"`) navigates to `to`.
    pub fn on_click(mut self, from: &str, selector: &str, to: &str) -> Self {
        self.clicks
            .insert((from.to_string(), selector.to_string()), to.to_string());
        self
    }

    /// Submitting `text` in any search input navigates to `to`.
    pub fn on_search(mut self, text: &str, to: &str) -> Self {
        self.searches.insert(text.to_string(), to.to_string());
        self
    }

    /// Navigating to `url` fails.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// The `nth` visit (1-based) to exactly `url` lands on `to` instead.
    pub fn redirect_visit(mut self, url: &str, nth: usize, to: &str) -> Self {
        self.redirects
            .insert(url.to_string(), (nth, to.to_string()));
        self
    }

    fn route(&self, url: &str) -> Option<String> {
        if self.pages.contains_key(url) {
            return Some(url.to_string());
        }
        self.pages
            .keys()
            .filter(|k| url.starts_with(k.as_str()))
            .max_by_key(|k| k.len())
            .cloned()
    }

    fn peek(&self) -> String {
        self.route(&self.current)
            .and_then(|k| self.pages.get(&k))
            .and_then(|q| q.front().cloned())
            .unwrap_or_else(|| "<html><body></body></html>".to_string())
    }

    fn click_target(&self, selector: &str) -> Option<String> {
        self.clicks
            .iter()
            .filter(|((from, sel), _)| {
                sel == selector && from != ANY_PAGE && self.current.starts_with(from.as_str())
            })
            .max_by_key(|((from, _), _)| from.len())
            .map(|(_, to)| to.clone())
            .or_else(|| {
                self.clicks
                    .get(&(ANY_PAGE.to_string(), selector.to_string()))
                    .cloned()
            })
    }

    fn go(&mut self, url: &str) -> Result<(), DriverError> {
        if self.failing.contains(url) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        let visit = self.visits.entry(url.to_string()).or_default();
        *visit += 1;
        let visit = *visit;
        self.current = match self.redirects.get(url) {
            Some((nth, to)) if *nth == visit => to.clone(),
            _ => url.to_string(),
        };
        self.navigations.push(url.to_string());
        Ok(())
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.go(url)
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        Ok(self.current.clone())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        let Some(key) = self.route(&self.current) else {
            return Ok(self.peek());
        };
        let queue = self.pages.get_mut(&key).expect("routed key exists");
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            Ok(queue.front().cloned().unwrap_or_default())
        }
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        self.scripts.push(script.to_string());
        Ok(serde_json::Value::Null)
    }

    async fn click(&mut self, element: &ElementLocator) -> Result<bool, DriverError> {
        self.clicked.push(element.clone());
        if let Some(to) = self.click_target(&element.selector) {
            self.go(&to)?;
            return Ok(true);
        }
        Ok(html_has(&self.peek(), &element.selector))
    }

    async fn fill(&mut self, element: &ElementLocator, text: &str) -> Result<(), DriverError> {
        self.filled
            .push((element.selector.clone(), text.to_string()));
        Ok(())
    }

    async fn type_and_submit(
        &mut self,
        element: &ElementLocator,
        text: &str,
    ) -> Result<(), DriverError> {
        self.submitted
            .push((element.selector.clone(), text.to_string()));
        if let Some(to) = self.searches.get(text).cloned() {
            self.go(&to)?;
        }
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<u64, DriverError> {
        Ok(2_000)
    }
}
