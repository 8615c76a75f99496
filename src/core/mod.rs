use tracing::info;

pub mod orchestrator;

pub use orchestrator::{RunTracker, ScrapeReport, ScrapeRun, ScrapeStage};

use crate::config::AppConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::export::ScrapeEnvelope;
use crate::logging::{LogContext, RunIdGenerator};
use crate::models::ScrapeBatch;
use crate::scraper::{launcher_for, SessionLauncher};

/// Entry point shared by both binaries
pub struct JobScraper {
    config: AppConfig,
}

impl JobScraper {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scrape with the backend selected by configuration
    pub async fn scrape(&self) -> ScrapeResult<ScrapeBatch> {
        let launcher = launcher_for(&self.config.scraper)?;
        self.scrape_with(launcher.as_ref()).await
    }

    pub async fn scrape_with(&self, launcher: &dyn SessionLauncher) -> ScrapeResult<ScrapeBatch> {
        let run_id = RunIdGenerator::generate();
        info!(
            run_id = %run_id,
            backend = launcher.describe(),
            max_jobs = self.config.scraper.max_jobs,
            "Starting job scrape"
        );

        let report = ScrapeRun::new(&self.config, run_id.clone()).execute(launcher).await?;
        let context = LogContext::new("core", "scrape")
            .with_run_id(run_id)
            .with_status("success")
            .with_number_field("found", report.found as i64)
            .with_number_field("scraped", report.batch.len() as i64)
            .with_number_field("skipped", report.skipped as i64);
        crate::log_info!(context, "Job scrape finished");
        Ok(report.batch)
    }

    /// Run a scrape and fold any failure into the envelope payload
    pub async fn run_envelope(&self) -> ScrapeEnvelope {
        match launcher_for(&self.config.scraper) {
            Ok(launcher) => self.run_envelope_with(launcher.as_ref()).await,
            Err(e) => self.failure_envelope(e),
        }
    }

    pub async fn run_envelope_with(&self, launcher: &dyn SessionLauncher) -> ScrapeEnvelope {
        match self.scrape_with(launcher).await {
            Ok(batch) => ScrapeEnvelope::success(batch),
            Err(e) => self.failure_envelope(e),
        }
    }

    fn failure_envelope(&self, error: ScrapeError) -> ScrapeEnvelope {
        let context = LogContext::new("core", "run_envelope")
            .with_url(&self.config.scraper.target_url)
            .with_status("failed")
            .with_error_category(error.category());
        crate::log_error!(context, error, "Scrape reported in envelope as failure");
        ScrapeEnvelope::failure(error.to_string())
    }
}
