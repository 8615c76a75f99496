//! `jobscrape`: direct entry point that saves the batch and dumps it to stdout.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use jobscrape::args::RunArgs;
use jobscrape::export::{export_json, format_dump};
use jobscrape::logging::init_logging;
use jobscrape::{AppConfig, JobScraper};

const DEFAULT_MAX_JOBS: usize = 50;

#[derive(Parser)]
#[command(name = "jobscrape")]
#[command(about = "Scrape job listings into a JSON file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[arg(short, long, help = "Output file path")]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.run.config.as_deref()).await?;
    let resolution = cli.run.apply(&mut config, DEFAULT_MAX_JOBS);
    if let Some(output) = cli.output {
        config.output.file_path = output;
    }
    config.validate()?;

    init_logging(&config.logging)?;

    if let Some(rejected) = &resolution.rejected {
        warn!("Invalid max_jobs argument '{}', using {}", rejected, resolution.max_jobs);
    }
    info!(
        "Starting scraper with max_jobs={}, headless={}",
        config.scraper.max_jobs, config.scraper.headless
    );

    let scraper = JobScraper::new(config);

    let batch = match scraper.scrape().await {
        Ok(batch) => batch,
        Err(e) => {
            error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    if batch.is_empty() {
        println!("No jobs were scraped");
        return Ok(());
    }

    let output_path = &scraper.config().output.file_path;
    let stats = export_json(&batch, output_path).await?;
    println!("Saved {} jobs to {}", stats.record_count, output_path.display());

    println!();
    println!("{}", format_dump(&batch)?);

    Ok(())
}
