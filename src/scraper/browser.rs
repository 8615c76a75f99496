//! Chromium sessions driven through Playwright.

use async_trait::async_trait;
use playwright::api::{Browser, ElementHandle, Page, Viewport};
use playwright::Playwright;
use std::time::Duration;
use tracing::{debug, warn};

use super::session::{BrowserSession, ListingElement, PageControl, SessionLauncher};
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};

const NAVIGATION_TIMEOUT_MS: f64 = 60_000.0;

/// Launches headless Chromium with a fixed viewport and user agent
pub struct PlaywrightLauncher {
    config: ScraperConfig,
}

impl PlaywrightLauncher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self { config: config.clone() }
    }
}

#[async_trait(?Send)]
impl SessionLauncher for PlaywrightLauncher {
    async fn open(&self) -> ScrapeResult<Box<dyn BrowserSession>> {
        debug!(headless = self.config.headless, "Initializing Playwright");

        let playwright = Playwright::initialize()
            .await
            .map_err(|e| ScrapeError::launch(e.to_string()))?;
        playwright
            .prepare()
            .map_err(|e| ScrapeError::launch(format!("browser install failed: {}", e)))?;

        let browser = playwright
            .chromium()
            .launcher()
            .headless(self.config.headless)
            .chromium_sandbox(false)
            .args(&self.config.launch_args)
            .launch()
            .await
            .map_err(|e| ScrapeError::launch(e.to_string()))?;

        let context = browser
            .context_builder()
            .user_agent(&self.config.user_agent)
            .viewport(Some(Viewport {
                width: self.config.viewport_width as i32,
                height: self.config.viewport_height as i32,
            }))
            .build()
            .await
            .map_err(|e| ScrapeError::launch(e.to_string()));

        // The browser process is already running; do not leak it on a late failure
        let page = match context {
            Ok(context) => context.new_page().await.map_err(|e| ScrapeError::launch(e.to_string())),
            Err(e) => Err(e),
        };
        let page = match page {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after launch error: {}", close_err);
                }
                return Err(e);
            }
        };

        Ok(Box::new(PlaywrightSession {
            _playwright: playwright,
            browser,
            page,
        }))
    }

    fn describe(&self) -> &'static str {
        "chromium"
    }
}

pub struct PlaywrightSession {
    _playwright: Playwright,
    browser: Browser,
    page: Page,
}

#[async_trait(?Send)]
impl BrowserSession for PlaywrightSession {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        self.page
            .goto_builder(url)
            .timeout(NAVIGATION_TIMEOUT_MS)
            .goto()
            .await
            .map_err(|e| ScrapeError::navigation(url, e.to_string()))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> ScrapeResult<()> {
        self.page
            .wait_for_selector_builder(selector)
            .timeout(timeout.as_millis() as f64)
            .wait_for_selector()
            .await
            .map_err(|e| ScrapeError::WaitTimeout {
                selector: selector.to_string(),
                seconds: timeout.as_secs(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> ScrapeResult<Vec<Box<dyn ListingElement>>> {
        let handles = self.page
            .query_selector_all(selector)
            .await
            .map_err(|e| element_error(selector, &e.to_string()))?;

        Ok(handles
            .into_iter()
            .map(|handle| Box::new(PlaywrightElement { handle }) as Box<dyn ListingElement>)
            .collect())
    }

    async fn find_control(&self, labels: &[String]) -> ScrapeResult<Option<Box<dyn PageControl>>> {
        // has-text matches a case-insensitive substring of the visible text
        let selector = labels
            .iter()
            .filter(|label| !label.trim().is_empty())
            .map(|label| format!("button:has-text(\"{}\")", label.replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(", ");

        let handle = self.page
            .query_selector(&selector)
            .await
            .map_err(|e| element_error(&selector, &e.to_string()))?;

        Ok(handle.map(|handle| Box::new(PlaywrightControl { handle }) as Box<dyn PageControl>))
    }

    async fn scroll_to_bottom(&self) -> ScrapeResult<()> {
        self.page
            .evaluate::<(), ()>("window.scrollTo(0, document.body.scrollHeight)", ())
            .await
            .map_err(|e| element_error("document.body", &e.to_string()))
    }

    async fn close(self: Box<Self>) -> ScrapeResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| ScrapeError::launch(format!("browser close failed: {}", e)))
    }
}

struct PlaywrightElement {
    handle: ElementHandle,
}

#[async_trait(?Send)]
impl ListingElement for PlaywrightElement {
    async fn first_text(&self, selector: &str) -> ScrapeResult<Option<String>> {
        let found = self.handle
            .query_selector(selector)
            .await
            .map_err(|e| element_error(selector, &e.to_string()))?;

        match found {
            Some(element) => element
                .inner_text()
                .await
                .map(Some)
                .map_err(|e| element_error(selector, &e.to_string())),
            None => Ok(None),
        }
    }

    async fn all_texts(&self, selector: &str) -> ScrapeResult<Vec<String>> {
        let found = self.handle
            .query_selector_all(selector)
            .await
            .map_err(|e| element_error(selector, &e.to_string()))?;

        let mut texts = Vec::with_capacity(found.len());
        for element in found {
            texts.push(
                element
                    .inner_text()
                    .await
                    .map_err(|e| element_error(selector, &e.to_string()))?,
            );
        }
        Ok(texts)
    }

    async fn first_attribute(&self, selector: &str, name: &str) -> ScrapeResult<Option<String>> {
        let found = self.handle
            .query_selector(selector)
            .await
            .map_err(|e| element_error(selector, &e.to_string()))?;

        match found {
            Some(element) => element
                .get_attribute(name)
                .await
                .map_err(|e| element_error(selector, &e.to_string())),
            None => Ok(None),
        }
    }
}

struct PlaywrightControl {
    handle: ElementHandle,
}

#[async_trait(?Send)]
impl PageControl for PlaywrightControl {
    async fn is_actionable(&self) -> ScrapeResult<bool> {
        let visible = self.handle
            .is_visible()
            .await
            .map_err(|e| element_error("button", &e.to_string()))?;
        let enabled = self.handle
            .is_enabled()
            .await
            .map_err(|e| element_error("button", &e.to_string()))?;
        Ok(visible && enabled)
    }

    async fn activate(&self) -> ScrapeResult<()> {
        self.handle
            .click_builder()
            .click()
            .await
            .map_err(|e| element_error("button", &e.to_string()))
    }
}

fn element_error(selector: &str, message: &str) -> ScrapeError {
    if message.contains("not attached") || message.contains("detached") {
        ScrapeError::StaleElement
    } else {
        ScrapeError::query(selector, message)
    }
}
