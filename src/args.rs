//! Command-line arguments shared by the `run-scraper` and `jobscrape` binaries.

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[arg(allow_negative_numbers = true, help = "Maximum number of listings to extract")]
    pub max_jobs: Option<String>,

    #[arg(help = "Pass \"false\" to run the browser with a visible window")]
    pub headless: Option<String>,

    #[arg(short, long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Job board URL to scrape")]
    pub url: Option<String>,

    #[arg(long, help = "Extract from a saved HTML page instead of a live session")]
    pub html_file: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

/// Arguments of the `run-scraper` wrapper
#[derive(Debug, Parser)]
#[command(name = "run-scraper")]
#[command(about = "Scrape job listings and print a single JSON envelope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct WrapperCli {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Where the effective `max_jobs` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxJobsSource {
    Argument,
    Environment,
    Default,
}

/// Outcome of settling `max_jobs` for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxJobsResolution {
    pub max_jobs: usize,
    pub source: MaxJobsSource,
    /// Positional value that was given but is not a non-negative integer
    pub rejected: Option<String>,
}

impl MaxJobsResolution {
    /// Positional argument first, then `JOBSCRAPE_MAX_JOBS`, then `default_max_jobs`
    pub fn resolve(argument: Option<&str>, environment: Option<usize>, default_max_jobs: usize) -> Self {
        let mut rejected = None;

        if let Some(raw) = argument {
            match raw.trim().parse::<usize>() {
                Ok(max_jobs) => {
                    return Self {
                        max_jobs,
                        source: MaxJobsSource::Argument,
                        rejected: None,
                    }
                }
                Err(_) => rejected = Some(raw.to_string()),
            }
        }

        match environment {
            Some(max_jobs) => Self {
                max_jobs,
                source: MaxJobsSource::Environment,
                rejected,
            },
            None => Self {
                max_jobs: default_max_jobs,
                source: MaxJobsSource::Default,
                rejected,
            },
        }
    }
}

impl RunArgs {
    /// Fold the arguments into a loaded configuration
    pub fn apply(&self, config: &mut AppConfig, default_max_jobs: usize) -> MaxJobsResolution {
        if let Some(url) = &self.url {
            config.scraper.target_url = url.clone();
        }
        if let Some(path) = &self.html_file {
            config.scraper.html_file = Some(path.clone());
        }
        if let Some(headless) = self.headless_flag() {
            config.scraper.headless = headless;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }

        let resolution = MaxJobsResolution::resolve(self.max_jobs.as_deref(), env_max_jobs(), default_max_jobs);
        config.scraper.max_jobs = resolution.max_jobs;
        resolution
    }

    /// Anything other than a case-insensitive "false" keeps headless mode
    pub fn headless_flag(&self) -> Option<bool> {
        self.headless
            .as_deref()
            .map(|value| !value.trim().eq_ignore_ascii_case("false"))
    }
}

fn env_max_jobs() -> Option<usize> {
    std::env::var("JOBSCRAPE_MAX_JOBS").ok()?.parse().ok()
}
