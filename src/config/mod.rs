use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::logging::LoggingConfig;
use crate::models::IdStrategy;
use crate::utils::StringUtils;

pub const DEFAULT_TARGET_URL: &str = "https://www.actuarylist.com/jobs";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub pagination: PaginationConfig,
    pub output: OutputConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub target_url: String,
    pub listing_selector: String,
    pub max_jobs: usize,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub launch_args: Vec<String>,
    pub page_load_timeout_secs: u64,
    pub request_timeout_seconds: u64,
    pub html_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub max_attempts: usize,
    pub pause_ms: u64,
    pub button_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file_path: PathBuf,
    pub id_strategy: IdStrategy,
    pub source_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub program: PathBuf,
    pub timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            pagination: PaginationConfig::default(),
            output: OutputConfig::default(),
            bridge: BridgeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            listing_selector: ".job-listing".to_string(),
            max_jobs: 50,
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            launch_args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
            page_load_timeout_secs: 20,
            request_timeout_seconds: 30,
            html_file: None,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause_ms: 2000,
            button_labels: vec!["Load More".to_string(), "Show More".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("scraped_jobs.json"),
            id_strategy: IdStrategy::Sequential,
            source_name: "ActuaryList.com".to_string(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("run-scraper"),
            timeout_seconds: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, the platform config directory, or defaults.
    ///
    /// Environment overrides are applied; validation is left to the caller so
    /// command-line overrides can be folded in first.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path).await?,
            None => {
                let config_path = get_config_path();
                if config_path.exists() {
                    Self::load_from_file(&config_path).await?
                } else {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            }
        };

        ConfigOverrides::apply(&mut config);
        Ok(config)
    }

    /// Load configuration from specific file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scraper.html_file.is_none() {
            url::Url::parse(&self.scraper.target_url)
                .map_err(|e| anyhow::anyhow!("Invalid target_url '{}': {}", self.scraper.target_url, e))?;
        }

        if StringUtils::is_blank(&self.scraper.listing_selector) {
            return Err(anyhow::anyhow!("Scraper listing_selector must not be empty"));
        }

        if self.scraper.page_load_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Scraper page_load_timeout_secs must be > 0"));
        }

        if StringUtils::is_blank(&self.scraper.user_agent) {
            return Err(anyhow::anyhow!("A user agent must be configured"));
        }

        if self.pagination.button_labels.iter().all(|label| StringUtils::is_blank(label)) {
            return Err(anyhow::anyhow!("At least one pagination button label must be configured"));
        }

        if self.bridge.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Bridge timeout_seconds must be > 0"));
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "jobscrape", "jobscrape")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("jobscrape.toml"))
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to configuration
    pub fn apply(config: &mut AppConfig) {
        if let Ok(url) = std::env::var("JOBSCRAPE_URL") {
            config.scraper.target_url = url;
        }

        if let Ok(headless) = std::env::var("JOBSCRAPE_HEADLESS") {
            config.scraper.headless = headless.to_lowercase() != "false";
        }

        if let Ok(max_jobs_str) = std::env::var("JOBSCRAPE_MAX_JOBS") {
            if let Ok(max_jobs) = max_jobs_str.parse::<usize>() {
                config.scraper.max_jobs = max_jobs;
            }
        }

        if let Ok(output) = std::env::var("JOBSCRAPE_OUTPUT") {
            config.output.file_path = PathBuf::from(output);
        }

        if let Ok(log_level) = std::env::var("JOBSCRAPE_LOG_LEVEL") {
            config.logging.level = log_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scraper.page_load_timeout_secs, 20);
        assert_eq!(config.pagination.max_attempts, 3);
        assert_eq!(config.bridge.timeout_seconds, 300);
        assert!(config.scraper.launch_args.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = AppConfig::default();
        config.scraper.target_url = "not a url".to_string();
        assert!(config.validate().is_err());

        // Offline runs do not need a reachable URL
        config.scraper.html_file = Some(PathBuf::from("fixture.html"));
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[scraper]\nlisting_selector = \".posting\"\n\n[output]\nid_strategy = \"content_hash\""
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.scraper.listing_selector, ".posting");
        assert_eq!(config.scraper.target_url, DEFAULT_TARGET_URL);
        assert_eq!(config.output.id_strategy, IdStrategy::ContentHash);
        assert_eq!(config.pagination.pause_ms, 2000);
    }

    #[tokio::test]
    async fn test_load_defers_validation_to_caller() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scraper]\ntarget_url = \"saved-board\"").unwrap();

        let mut config = AppConfig::load(Some(file.path())).await.unwrap();
        if std::env::var("JOBSCRAPE_URL").is_err() {
            assert_eq!(config.scraper.target_url, "saved-board");
            assert!(config.validate().is_err());
        }

        config.scraper.html_file = Some(PathBuf::from("saved-board.html"));
        assert!(config.validate().is_ok());
    }
}
