//! Session over server-rendered HTML, parsed once per navigation with `scraper`.
//!
//! No script runs, so pagination controls can be found but not activated.
//! Backs offline runs against saved pages and the extraction tests.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use super::http_client::HttpClient;
use super::session::{BrowserSession, ListingElement, PageControl, SessionLauncher};
use crate::error::{ScrapeError, ScrapeResult};

/// Where the page HTML comes from
#[derive(Clone)]
pub enum PageSource {
    Http(HttpClient),
    File(PathBuf),
    Inline(String),
}

/// Launcher for static HTML sessions
#[derive(Clone)]
pub struct StaticLauncher {
    source: PageSource,
}

impl StaticLauncher {
    pub fn new(source: PageSource) -> Self {
        Self { source }
    }

    pub fn inline(html: impl Into<String>) -> Self {
        Self::new(PageSource::Inline(html.into()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(PageSource::File(path.into()))
    }
}

#[async_trait(?Send)]
impl SessionLauncher for StaticLauncher {
    async fn open(&self) -> ScrapeResult<Box<dyn BrowserSession>> {
        Ok(Box::new(StaticPageSession {
            source: self.source.clone(),
            document: Rc::new(Html::new_document()),
        }))
    }

    fn describe(&self) -> &'static str {
        match self.source {
            PageSource::Http(_) => "static-http",
            PageSource::File(_) => "static-file",
            PageSource::Inline(_) => "static-inline",
        }
    }
}

pub struct StaticPageSession {
    source: PageSource,
    document: Rc<Html>,
}

#[async_trait(?Send)]
impl BrowserSession for StaticPageSession {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        let html = match &self.source {
            PageSource::Http(client) => client.fetch_html(url).await?,
            PageSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ScrapeError::navigation(path.display().to_string(), e.to_string()))?,
            PageSource::Inline(html) => html.clone(),
        };
        debug!(bytes = html.len(), "Static page loaded");
        self.document = Rc::new(Html::parse_document(&html));
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> ScrapeResult<()> {
        let parsed = parse_selector(selector)?;

        // Static content never changes, so an absent match is final
        if self.document.select(&parsed).next().is_some() {
            Ok(())
        } else {
            Err(ScrapeError::WaitTimeout {
                selector: selector.to_string(),
                seconds: timeout.as_secs(),
                message: "no matching element in the loaded page".to_string(),
            })
        }
    }

    async fn query_all(&self, selector: &str) -> ScrapeResult<Vec<Box<dyn ListingElement>>> {
        let parsed = parse_selector(selector)?;
        let count = self.document.select(&parsed).count();

        Ok((0..count)
            .map(|index| {
                Box::new(StaticElement {
                    document: self.document.clone(),
                    anchor: Anchor::Match { selector: parsed.clone(), index },
                }) as Box<dyn ListingElement>
            })
            .collect())
    }

    async fn find_control(&self, labels: &[String]) -> ScrapeResult<Option<Box<dyn PageControl>>> {
        let buttons = parse_selector("button")?;
        let labels: Vec<String> = labels.iter().map(|label| label.to_lowercase()).collect();

        let control = self.document.select(&buttons).find(|button| {
            let text = element_text(button).to_lowercase();
            labels.iter().any(|label| !label.is_empty() && text.contains(label.as_str()))
        });

        Ok(control.map(|button| {
            let element = button.value();
            let hidden = element.attr("hidden").is_some()
                || element.attr("style").map_or(false, |style| style.replace(' ', "").contains("display:none"));
            Box::new(StaticControl {
                actionable: element.attr("disabled").is_none() && !hidden,
            }) as Box<dyn PageControl>
        }))
    }

    async fn scroll_to_bottom(&self) -> ScrapeResult<()> {
        debug!("Scroll requested on static page, nothing to load");
        Ok(())
    }

    async fn close(self: Box<Self>) -> ScrapeResult<()> {
        Ok(())
    }
}

/// How a listing is found again inside its shared document
enum Anchor {
    /// `index`-th match of the listing selector, in document order
    Match { selector: Selector, index: usize },
    /// First element inside `<body>`
    BodyChild,
}

/// One listing inside a parsed page.
///
/// Queries run against the listing's subtree of the full document, so table
/// rows and other context-sensitive markup keep their descendants.
pub struct StaticElement {
    document: Rc<Html>,
    anchor: Anchor,
}

impl StaticElement {
    /// Standalone listing from its outer HTML
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            document: Rc::new(Html::parse_document(&html.into())),
            anchor: Anchor::BodyChild,
        }
    }

    fn listing(&self) -> Option<ElementRef<'_>> {
        match &self.anchor {
            Anchor::Match { selector, index } => self.document.select(selector).nth(*index),
            Anchor::BodyChild => self
                .document
                .root_element()
                .children()
                .filter_map(ElementRef::wrap)
                .find(|element| element.value().name() == "body")?
                .children()
                .find_map(ElementRef::wrap),
        }
    }

    fn with_matches<T>(
        &self,
        selector: &str,
        collect: impl FnOnce(&mut dyn Iterator<Item = ElementRef<'_>>) -> T,
    ) -> ScrapeResult<T> {
        let parsed = parse_selector(selector)?;
        let listing = self.listing().ok_or(ScrapeError::StaleElement)?;

        // Descendants only, like a browser's element-scoped query
        let mut matches = listing
            .select(&parsed)
            .filter(|element| element.id() != listing.id());
        Ok(collect(&mut matches))
    }
}

#[async_trait(?Send)]
impl ListingElement for StaticElement {
    async fn first_text(&self, selector: &str) -> ScrapeResult<Option<String>> {
        self.with_matches(selector, |matches| matches.next().map(|element| element_text(&element)))
    }

    async fn all_texts(&self, selector: &str) -> ScrapeResult<Vec<String>> {
        self.with_matches(selector, |matches| matches.map(|element| element_text(&element)).collect())
    }

    async fn first_attribute(&self, selector: &str, name: &str) -> ScrapeResult<Option<String>> {
        self.with_matches(selector, |matches| {
            matches
                .next()
                .and_then(|element| element.value().attr(name).map(str::to_string))
        })
    }
}

struct StaticControl {
    actionable: bool,
}

#[async_trait(?Send)]
impl PageControl for StaticControl {
    async fn is_actionable(&self) -> ScrapeResult<bool> {
        Ok(self.actionable)
    }

    async fn activate(&self) -> ScrapeResult<()> {
        Err(ScrapeError::Unsupported { operation: "click".to_string() })
    }
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::query(selector, format!("{:?}", e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="job-listing">
            <h3>Pricing   Actuary</h3>
            <span class="company-name" data-company="acme">Acme Re</span>
          </div>
          <div class="job-listing"><h3>Reserving Actuary</h3></div>
          <button disabled>Load More</button>
        </body></html>
    "#;

    async fn loaded(html: &str) -> Box<dyn BrowserSession> {
        let mut session = StaticLauncher::inline(html).open().await.unwrap();
        session.navigate("https://example.com/jobs").await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_query_all_returns_listings_in_order() {
        let session = loaded(PAGE).await;
        let listings = session.query_all(".job-listing").await.unwrap();
        assert_eq!(listings.len(), 2);

        let title = listings[1].first_text("h3").await.unwrap();
        assert_eq!(title.as_deref().map(str::trim), Some("Reserving Actuary"));
    }

    #[tokio::test]
    async fn test_element_queries_are_scoped_to_descendants() {
        let element = StaticElement::new(r#"<div class="job-type-card"><span class="job-type">Contract</span></div>"#);

        let text = element.first_text("[class*='type']").await.unwrap();
        assert_eq!(text.as_deref(), Some("Contract"));

        let attr = StaticElement::new(r#"<div><span data-company="acme"></span></div>"#)
            .first_attribute("[data-company]", "data-company")
            .await
            .unwrap();
        assert_eq!(attr.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_table_row_listings_keep_their_cells() {
        let session = loaded(
            r#"<html><body><table>
                <tr class="job-listing"><td><h3>Pricing Actuary</h3><span class="company-name">Acme Re</span></td></tr>
                <tr class="job-listing"><td><h3>Valuation Analyst</h3><td class="location">Boston, MA</td></tr>
            </table></body></html>"#,
        )
        .await;
        let listings = session.query_all(".job-listing").await.unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].first_text("h3").await.unwrap().as_deref(), Some("Pricing Actuary"));
        assert_eq!(listings[0].first_text(".company-name").await.unwrap().as_deref(), Some("Acme Re"));
        assert_eq!(listings[1].first_text(".location").await.unwrap().as_deref(), Some("Boston, MA"));
        assert!(listings[1].first_text(".company-name").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_listing_is_wait_timeout() {
        let session = loaded("<html><body><p>maintenance</p></body></html>").await;
        let err = session
            .wait_for(".job-listing", Duration::from_secs(20))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::WaitTimeout { seconds: 20, .. }));
    }

    #[tokio::test]
    async fn test_find_control_matches_label_case_insensitively() {
        let session = loaded(PAGE).await;
        let labels = vec!["load more".to_string()];
        let control = session.find_control(&labels).await.unwrap().unwrap();
        assert!(!control.is_actionable().await.unwrap());

        let none = session.find_control(&["Next page".to_string()]).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_file_source_missing_is_navigation_error() {
        let mut session = StaticLauncher::file("/nonexistent/jobs.html").open().await.unwrap();
        let err = session.navigate("https://example.com/jobs").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Navigation { .. }));
    }
}
