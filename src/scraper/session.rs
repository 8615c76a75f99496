//! Capability surface of a rendering session.
//!
//! The extractor and pagination expander only ever see these traits, so a
//! Chromium session and a static-HTML session are interchangeable.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ScrapeResult;

/// Opens sessions. Launch failures are fatal to the run.
#[async_trait(?Send)]
pub trait SessionLauncher {
    async fn open(&self) -> ScrapeResult<Box<dyn BrowserSession>>;

    /// Short name for logs.
    fn describe(&self) -> &'static str;
}

/// A single loaded page.
#[async_trait(?Send)]
pub trait BrowserSession {
    /// Load `url` into the session.
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()>;
    /// Wait until at least one element matches `selector`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> ScrapeResult<()>;
    /// All elements currently matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> ScrapeResult<Vec<Box<dyn ListingElement>>>;
    /// First button whose visible text contains one of `labels`, ignoring case.
    async fn find_control(&self, labels: &[String]) -> ScrapeResult<Option<Box<dyn PageControl>>>;
    async fn scroll_to_bottom(&self) -> ScrapeResult<()>;
    /// Release the session and any OS processes behind it.
    async fn close(self: Box<Self>) -> ScrapeResult<()>;
}

/// Handle to one listing's DOM subtree. Only valid while its session is open.
#[async_trait(?Send)]
pub trait ListingElement {
    /// Text of the first descendant matching `selector`, `None` if nothing matches.
    async fn first_text(&self, selector: &str) -> ScrapeResult<Option<String>>;
    /// Text of every descendant matching `selector`.
    async fn all_texts(&self, selector: &str) -> ScrapeResult<Vec<String>>;
    /// Attribute `name` of the first descendant matching `selector`.
    async fn first_attribute(&self, selector: &str, name: &str) -> ScrapeResult<Option<String>>;
}

/// An interactive control such as a "Load More" button.
#[async_trait(?Send)]
pub trait PageControl {
    /// Visible and enabled.
    async fn is_actionable(&self) -> ScrapeResult<bool>;
    async fn activate(&self) -> ScrapeResult<()>;
}
