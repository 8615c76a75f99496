use reqwest::{header::{HeaderMap, HeaderValue}, Client};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};

/// HTTP client used by the static page session
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create new HTTP client presenting the configured browser signature
    pub fn new(config: &ScraperConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"));
        headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScrapeError::launch(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch a page body as text
    pub async fn fetch_html(&self, url: &str) -> ScrapeResult<String> {
        let start_time = Instant::now();

        let response = self.client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScrapeError::Http { url: url.to_string(), message: e.to_string() })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Http { url: url.to_string(), message: e.to_string() })?;

        debug!(
            url,
            status,
            bytes = body.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(body)
    }
}
