//! Chromium driver over the DevTools protocol.
//!
//! Launches (or attaches to) Chrome with stealth flags, keeps a single page
//! open for the whole crawl and re-applies evasion scripts after every
//! navigation.

#[cfg(feature = "browser")]
use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;

use super::config::BrowserEngineConfig;
#[cfg(feature = "browser")]
use super::stealth::{LAUNCH_ARGS, SCROLL_SCRIPT, STEALTH_SCRIPTS, WAIT_FOR_READY_SCRIPT};
use super::{Driver, ElementLocator};
use crate::scrapers::error::DriverError;
#[cfg(feature = "browser")]
use crate::scrapers::user_agent::resolve_user_agent;

/// Chromium-backed [`Driver`].
#[cfg(feature = "browser")]
pub struct ChromeDriver {
    config: BrowserEngineConfig,
    browser: Browser,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
}

#[cfg(feature = "browser")]
impl ChromeDriver {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/opt/google/chrome/google-chrome",
    ];

    /// Launch Chrome (or connect to `remote_url`) and open the working page.
    pub async fn launch(config: BrowserEngineConfig) -> Result<Self, DriverError> {
        let (browser, mut handler) = match config.remote_url.clone() {
            Some(remote_url) => Self::connect_remote(&remote_url, &config).await?,
            None => Self::launch_local(&config).await?,
        };

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(protocol)?;
        let user_agent = resolve_user_agent(config.user_agent.as_deref());
        page.execute(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(protocol)?;

        Ok(Self {
            config,
            browser,
            page,
            handler,
        })
    }

    fn find_chrome() -> Result<std::path::PathBuf, DriverError> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        info!("Found Chrome in PATH: {}", path);
                        return Ok(std::path::PathBuf::from(path));
                    }
                }
            }
        }

        Err(DriverError::Launch(
            "Chrome/Chromium not found; install it or set browser.remote_url".to_string(),
        ))
    }

    async fn launch_local(
        config: &BrowserEngineConfig,
    ) -> Result<(Browser, chromiumoxide::Handler), DriverError> {
        info!("Launching browser (headless={})", config.headless);

        let mut builder = BrowserConfig::builder()
            .chrome_executable(Self::find_chrome()?)
            .request_timeout(Duration::from_secs(config.timeout));

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(ref proxy) = config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }
        for arg in LAUNCH_ARGS {
            builder = builder.arg(*arg);
        }
        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder.build().map_err(DriverError::Launch)?;
        Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))
    }

    async fn connect_remote(
        url: &str,
        config: &BrowserEngineConfig,
    ) -> Result<(Browser, chromiumoxide::Handler), DriverError> {
        info!("Connecting to remote browser at {}", url);

        // WebSocket URL comes from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .send()
            .await
            .map_err(|e| DriverError::Launch(format!("remote browser unreachable: {}", e)))?
            .json()
            .await
            .map_err(|e| DriverError::Launch(format!("bad browser version info: {}", e)))?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DriverError::Launch("no webSocketDebuggerUrl in response".into()))?;

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(config.timeout),
            ..Default::default()
        };
        Browser::connect_with_config(ws_url, handler_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))
    }

    async fn wait_for_ready(&self) {
        let timeout = Duration::from_secs(self.config.timeout);
        match tokio::time::timeout(timeout, self.page.evaluate(WAIT_FOR_READY_SCRIPT)).await {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page ready state"),
        }
    }

    async fn apply_stealth(&self) {
        for script in STEALTH_SCRIPTS {
            if let Err(e) = self.page.evaluate(*script).await {
                debug!("Stealth script injection skipped: {}", e);
            }
        }
    }

    async fn element(&self, locator: &ElementLocator) -> Result<Element, DriverError> {
        self.page
            .find_elements(locator.selector.as_str())
            .await
            .map_err(protocol)?
            .into_iter()
            .nth(locator.index)
            .ok_or_else(|| DriverError::ElementNotFound(locator.js_expr()))
    }

    /// Close the browser and stop the protocol handler.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
    }
}

#[cfg(feature = "browser")]
fn protocol(e: chromiumoxide::error::CdpError) -> DriverError {
    DriverError::Protocol(e.to_string())
}

#[cfg(feature = "browser")]
#[async_trait]
impl Driver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.wait_for_ready().await;
        if self.config.stealth {
            self.apply_stealth().await;
        }
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        Ok(self.page.url().await.map_err(protocol)?.unwrap_or_default())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        self.page.content().await.map_err(protocol)
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn click(&mut self, element: &ElementLocator) -> Result<bool, DriverError> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            element.js_expr()
        );
        let clicked = self.execute_script(&script).await?;
        Ok(clicked.as_bool().unwrap_or(false))
    }

    async fn fill(&mut self, element: &ElementLocator, text: &str) -> Result<(), DriverError> {
        let clear = format!(
            "(() => {{ const el = {}; if (el) {{ el.scrollIntoView(true); el.value = ''; }} }})()",
            element.js_expr()
        );
        self.execute_script(&clear).await?;
        let el = self.element(element).await?;
        el.click().await.map_err(protocol)?;
        el.type_str(text).await.map_err(protocol)?;
        Ok(())
    }

    async fn type_and_submit(
        &mut self,
        element: &ElementLocator,
        text: &str,
    ) -> Result<(), DriverError> {
        self.fill(element, text).await?;
        let el = self.element(element).await?;
        el.press_key("Enter").await.map_err(protocol)?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<u64, DriverError> {
        let height = self.execute_script(SCROLL_SCRIPT).await?;
        Ok(height.as_u64().unwrap_or(0))
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromeDriver;

#[cfg(not(feature = "browser"))]
impl ChromeDriver {
    pub async fn launch(_config: BrowserEngineConfig) -> Result<Self, DriverError> {
        Err(DriverError::NotAvailable)
    }

    pub async fn close(self) {}
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl Driver for ChromeDriver {
    async fn navigate(&mut self, _url: &str) -> Result<(), DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn execute_script(&mut self, _script: &str) -> Result<serde_json::Value, DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn click(&mut self, _element: &ElementLocator) -> Result<bool, DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn fill(&mut self, _element: &ElementLocator, _text: &str) -> Result<(), DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn type_and_submit(
        &mut self,
        _element: &ElementLocator,
        _text: &str,
    ) -> Result<(), DriverError> {
        Err(DriverError::NotAvailable)
    }

    async fn scroll_to_bottom(&mut self) -> Result<u64, DriverError> {
        Err(DriverError::NotAvailable)
    }
}
