//! Page sessions and pagination.
//!
//! With the `browser` feature the session is headless Chromium via Playwright.
//! Without it, pages are fetched over HTTP and parsed as static HTML.

pub mod http_client;
pub mod pagination;
pub mod session;
pub mod static_page;

#[cfg(feature = "browser")]
pub mod browser;

pub use pagination::{expand, ExpansionOutcome};
pub use session::{BrowserSession, ListingElement, PageControl, SessionLauncher};
pub use static_page::{PageSource, StaticLauncher};

use crate::config::ScraperConfig;
use crate::error::ScrapeResult;

/// Pick the session backend for a run.
///
/// A configured `html_file` always wins so saved pages can be replayed offline.
pub fn launcher_for(config: &ScraperConfig) -> ScrapeResult<Box<dyn SessionLauncher>> {
    if let Some(path) = &config.html_file {
        return Ok(Box::new(StaticLauncher::file(path.clone())));
    }

    #[cfg(feature = "browser")]
    let launcher: Box<dyn SessionLauncher> = Box::new(browser::PlaywrightLauncher::new(config));

    #[cfg(not(feature = "browser"))]
    let launcher: Box<dyn SessionLauncher> = Box::new(StaticLauncher::new(PageSource::Http(
        http_client::HttpClient::new(config)?,
    )));

    Ok(launcher)
}
