use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extract::extract_listing;
use crate::logging::{LogContext, PerformanceLogger};
use crate::models::{RecordAssembler, ScrapeBatch};
use crate::scraper::{expand, BrowserSession, ExpansionOutcome, SessionLauncher};

/// Lifecycle of a single scrape invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    Idle,
    SessionOpen,
    PageLoaded,
    Expanding,
    Extracting,
    Done,
    Failed,
}

impl ScrapeStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScrapeStage::Done | ScrapeStage::Failed)
    }
}

impl std::fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeStage::Idle => write!(f, "Idle"),
            ScrapeStage::SessionOpen => write!(f, "Session Open"),
            ScrapeStage::PageLoaded => write!(f, "Page Loaded"),
            ScrapeStage::Expanding => write!(f, "Expanding"),
            ScrapeStage::Extracting => write!(f, "Extracting"),
            ScrapeStage::Done => write!(f, "Done"),
            ScrapeStage::Failed => write!(f, "Failed"),
        }
    }
}

/// Stage tracker for one run
#[derive(Debug, Clone)]
pub struct RunTracker {
    stage: ScrapeStage,
    history: Vec<ScrapeStage>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            stage: ScrapeStage::Idle,
            history: vec![ScrapeStage::Idle],
        }
    }

    pub fn history(&self) -> &[ScrapeStage] {
        &self.history
    }

    fn advance(&mut self, next: ScrapeStage) {
        debug!(from = %self.stage, to = %next, "Scrape stage transition");
        self.stage = next;
        self.history.push(next);
    }

    fn fail(&mut self, error: &ScrapeError) {
        if !self.stage.is_terminal() {
            warn!(stage = %self.stage, category = error.category(), "Scrape failed: {}", error);
            self.advance(ScrapeStage::Failed);
        }
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub batch: ScrapeBatch,
    pub found: usize,
    pub skipped: usize,
    pub expansion: ExpansionOutcome,
}

/// Drives one session from launch to teardown
pub struct ScrapeRun<'a> {
    config: &'a AppConfig,
    run_id: String,
}

impl<'a> ScrapeRun<'a> {
    pub fn new(config: &'a AppConfig, run_id: impl Into<String>) -> Self {
        Self {
            config,
            run_id: run_id.into(),
        }
    }

    pub async fn execute(&self, launcher: &dyn SessionLauncher) -> ScrapeResult<ScrapeReport> {
        let mut tracker = RunTracker::new();
        self.execute_tracked(launcher, &mut tracker).await
    }

    /// Run with an externally owned tracker so callers can inspect the stages taken.
    pub async fn execute_tracked(
        &self,
        launcher: &dyn SessionLauncher,
        tracker: &mut RunTracker,
    ) -> ScrapeResult<ScrapeReport> {
        let context = LogContext::new("orchestrator", "scrape")
            .with_run_id(&self.run_id)
            .with_url(&self.config.scraper.target_url)
            .with_string_field("backend", launcher.describe());
        let perf = PerformanceLogger::new(context);

        let mut session = match launcher.open().await {
            Ok(session) => session,
            Err(e) => {
                tracker.fail(&e);
                tracker.advance(ScrapeStage::Idle);
                perf.finish_with_error("Browser session could not be opened", &e);
                return Err(e);
            }
        };
        tracker.advance(ScrapeStage::SessionOpen);

        let result = self.drive(session.as_mut(), tracker).await;
        if let Err(e) = &result {
            tracker.fail(e);
        }

        // Teardown runs on every path once a session exists
        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        tracker.advance(ScrapeStage::Idle);

        match &result {
            Ok(report) => perf.finish_with_status(
                &format!("Successfully scraped {} jobs", report.batch.len()),
                "success",
            ),
            Err(e) => perf.finish_with_error("Scrape run failed", e),
        }

        result
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        tracker: &mut RunTracker,
    ) -> ScrapeResult<ScrapeReport> {
        let scraper = &self.config.scraper;

        info!("Navigating to {}", scraper.target_url);
        session.navigate(&scraper.target_url).await?;
        session
            .wait_for(
                &scraper.listing_selector,
                Duration::from_secs(scraper.page_load_timeout_secs),
            )
            .await?;
        tracker.advance(ScrapeStage::PageLoaded);

        tracker.advance(ScrapeStage::Expanding);
        let expansion = expand(&*session, &self.config.pagination).await;
        debug!(outcome = ?expansion, "Pagination expansion finished");

        tracker.advance(ScrapeStage::Extracting);
        let elements = session.query_all(&scraper.listing_selector).await?;
        let found = elements.len();
        info!("Found {} job listings", found);

        let mut assembler = RecordAssembler::new(
            Utc::now(),
            self.config.output.id_strategy,
            self.config.output.source_name.clone(),
        );
        let mut records = Vec::with_capacity(found.min(scraper.max_jobs));
        let mut skipped = 0;

        for (index, element) in elements.iter().take(scraper.max_jobs).enumerate() {
            match extract_listing(element.as_ref()).await {
                Ok(fields) => {
                    let record = assembler.assemble(fields);
                    info!("Scraped job {}: {} at {}", index + 1, record.title, record.company);
                    records.push(record);
                }
                Err(e) => {
                    let context = LogContext::new("orchestrator", "extract_listing")
                        .with_run_id(&self.run_id)
                        .with_error_category(e.category())
                        .with_number_field("listing", (index + 1) as i64)
                        .with_string_field("error", e.to_string());
                    crate::log_warn!(context, "Error scraping job, skipping");
                    skipped += 1;
                }
            }
        }

        tracker.advance(ScrapeStage::Done);

        Ok(ScrapeReport {
            batch: ScrapeBatch::new(records),
            found,
            skipped,
            expansion,
        })
    }
}
