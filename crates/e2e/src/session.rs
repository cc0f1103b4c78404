//! Browser session management.
//!
//! One [`Session`] wraps one WebDriver session (browser context + tab).
//! Serial scenario groups share a session to keep authenticated state;
//! everything else gets an isolated one. All waits here are bounded polls:
//! the suite never interacts with an element before it reaches the required
//! state, and never spins forever.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use thirtyfour::prelude::*;
use tracing::{debug, info};

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};

/// Handle to a live browser tab, cheap to clone.
#[derive(Clone)]
pub struct Session {
    driver: WebDriver,
    cfg: Arc<SuiteConfig>,
}

impl Session {
    /// Open a new browser session against the configured WebDriver endpoint.
    pub async fn connect(cfg: Arc<SuiteConfig>) -> E2eResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if cfg.headless {
            caps.add_arg("--headless=new")?;
        }
        for arg in &cfg.browser_args {
            caps.add_arg(arg)?;
        }

        let driver = WebDriver::new(&cfg.webdriver_url, caps).await.map_err(|e| {
            E2eError::WebDriverUnreachable {
                url: cfg.webdriver_url.clone(),
                reason: e.to_string(),
            }
        })?;
        driver
            .set_window_rect(0, 0, cfg.viewport_width, cfg.viewport_height)
            .await?;

        info!(endpoint = %cfg.webdriver_url, "browser session opened");
        Ok(Self { driver, cfg })
    }

    /// Close the browser. Errors here are surfaced so group teardown can
    /// decide to log-and-suppress.
    pub async fn quit(self) -> E2eResult<()> {
        self.driver.quit().await?;
        Ok(())
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.cfg
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Navigate to a storefront path (joined onto the base URL).
    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        let url = self.cfg.url(path);
        debug!(%url, "navigate");
        self.driver.goto(url).await?;
        Ok(())
    }

    pub async fn title(&self) -> E2eResult<String> {
        Ok(self.driver.title().await?)
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    pub async fn page_source(&self) -> E2eResult<String> {
        Ok(self.driver.source().await?)
    }

    /// Resize the window; visual scenarios snapshot several viewports.
    pub async fn set_viewport(&self, width: u32, height: u32) -> E2eResult<()> {
        self.driver.set_window_rect(0, 0, width, height).await?;
        Ok(())
    }

    pub async fn screenshot(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.driver.screenshot(path).await?;
        Ok(())
    }

    // ---- bounded waits ----------------------------------------------------

    /// Wait until an element matching `by` exists and is displayed.
    pub async fn wait_visible(&self, by: By, timeout: Duration) -> E2eResult<WebElement> {
        let what = format!("{by:?} to be visible");
        let elem = self
            .driver
            .query(by)
            .wait(timeout, self.cfg.poll_interval)
            .first()
            .await
            .map_err(|_| self.timeout(&what, timeout))?;
        elem.wait_until()
            .wait(timeout, self.cfg.poll_interval)
            .displayed()
            .await
            .map_err(|_| self.timeout(&what, timeout))?;
        Ok(elem)
    }

    /// Wait until the element is displayed and enabled, then return it.
    pub async fn wait_clickable(&self, by: By, timeout: Duration) -> E2eResult<WebElement> {
        let what = format!("{by:?} to be clickable");
        let elem = self.wait_visible(by, timeout).await?;
        elem.wait_until()
            .wait(timeout, self.cfg.poll_interval)
            .enabled()
            .await
            .map_err(|_| self.timeout(&what, timeout))?;
        Ok(elem)
    }

    /// Wait until no displayed element matches `by` (hidden or detached).
    pub async fn wait_hidden(&self, by: By, timeout: Duration) -> E2eResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let mut any_displayed = false;
            if let Ok(elems) = self.driver.find_all(by.clone()).await {
                for elem in elems {
                    // A stale handle means the element left the DOM.
                    if elem.is_displayed().await.unwrap_or(false) {
                        any_displayed = true;
                        break;
                    }
                }
            }
            if !any_displayed {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(&format!("{by:?} to be hidden"), timeout));
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    /// Wait until the current URL matches `pattern`.
    pub async fn wait_url_matches(&self, pattern: &Regex, timeout: Duration) -> E2eResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let url = self.current_url().await?;
            if pattern.is_match(&url) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(format!(
                    "expected URL matching `{pattern}`, last saw `{url}`"
                )));
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    /// Wait until the document title equals `expected`.
    pub async fn wait_title_is(&self, expected: &str, timeout: Duration) -> E2eResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let title = self.title().await?;
            if title == expected {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(format!(
                    "expected title `{expected}`, last saw `{title}`"
                )));
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    /// Wait until a displayed element matching `by` contains `needle`
    /// (case-insensitive), returning its full text.
    pub async fn wait_text_contains(
        &self,
        by: By,
        needle: &str,
        timeout: Duration,
    ) -> E2eResult<String> {
        let needle_lower = needle.to_lowercase();
        let deadline = Instant::now() + timeout;
        let mut last_seen = String::new();
        loop {
            if let Ok(elems) = self.driver.find_all(by.clone()).await {
                for elem in elems {
                    if !elem.is_displayed().await.unwrap_or(false) {
                        continue;
                    }
                    if let Ok(text) = elem.text().await {
                        if text.to_lowercase().contains(&needle_lower) {
                            return Ok(text);
                        }
                        last_seen = text;
                    }
                }
            }
            if Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(format!(
                    "expected {by:?} to contain `{needle}`, last saw `{last_seen}`"
                )));
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    /// Wait until exactly `expected` elements match `by`.
    pub async fn wait_count(&self, by: By, expected: usize, timeout: Duration) -> E2eResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let last = self.count(by.clone()).await?;
            if last == expected {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(format!(
                    "expected {expected} elements for {by:?}, last saw {last}"
                )));
            }
            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    pub async fn count(&self, by: By) -> E2eResult<usize> {
        Ok(self.driver.find_all(by).await?.len())
    }

    pub async fn exists(&self, by: By) -> E2eResult<bool> {
        Ok(!self.driver.find_all(by).await?.is_empty())
    }

    // ---- interactions (wait-then-act) -------------------------------------

    /// Clear and fill a text input once it becomes visible.
    pub async fn fill(&self, by: By, value: &str) -> E2eResult<()> {
        let elem = self.wait_visible(by, self.cfg.action_timeout).await?;
        elem.clear().await?;
        elem.send_keys(value).await?;
        Ok(())
    }

    /// Click an element once it becomes visible and enabled.
    pub async fn click(&self, by: By) -> E2eResult<()> {
        let elem = self.wait_clickable(by, self.cfg.action_timeout).await?;
        elem.click().await?;
        Ok(())
    }

    /// Capture failure diagnostics: full-page screenshot plus page source.
    pub async fn dump_failure(&self, name: &str) -> E2eResult<()> {
        let dir = self.cfg.output_dir.join("failures");
        std::fs::create_dir_all(&dir)?;
        self.screenshot(&dir.join(format!("{name}.png"))).await?;
        std::fs::write(dir.join(format!("{name}.html")), self.page_source().await?)?;
        Ok(())
    }

    fn timeout(&self, what: &str, timeout: Duration) -> E2eError {
        E2eError::Timeout {
            what: what.to_string(),
            elapsed_ms: timeout.as_millis() as u64,
        }
    }
}
