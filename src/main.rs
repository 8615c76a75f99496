//! `run-scraper`: prints exactly one JSON envelope line on stdout.
//!
//! Every outcome, including bad arguments, configuration and launch failures,
//! is reported inside the envelope and the process exits 0.

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{info, warn};

use jobscrape::args::{RunArgs, WrapperCli};
use jobscrape::logging::{init_logging, LoggingConfig};
use jobscrape::{AppConfig, JobScraper, ScrapeEnvelope};

const DEFAULT_MAX_JOBS: usize = 20;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let envelope = match WrapperCli::try_parse() {
        Ok(cli) => run(&cli.run).await,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => ScrapeEnvelope::failure(format!("Invalid arguments: {}", e.to_string().trim())),
    };

    match envelope.to_line() {
        Ok(line) => println!("{}", line),
        Err(e) => println!(
            "{}",
            serde_json::json!({"success": false, "error": e.to_string(), "jobs": [], "count": 0})
        ),
    }
}

async fn run(args: &RunArgs) -> ScrapeEnvelope {
    let mut config = match AppConfig::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&LoggingConfig::default());
            return ScrapeEnvelope::failure(format!("Configuration error: {}", e));
        }
    };

    let resolution = args.apply(&mut config, DEFAULT_MAX_JOBS);
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Err(e) = config.validate() {
        return ScrapeEnvelope::failure(format!("Configuration error: {}", e));
    }
    if let Some(rejected) = &resolution.rejected {
        warn!("Invalid max_jobs argument '{}', using {}", rejected, resolution.max_jobs);
    }

    info!(
        "Starting scraper with max_jobs={}, headless={}",
        config.scraper.max_jobs, config.scraper.headless
    );

    JobScraper::new(config).run_envelope().await
}
