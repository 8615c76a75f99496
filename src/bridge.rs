//! Caller side of the process boundary: run the wrapper binary and read its envelope.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::export::ScrapeEnvelope;
use crate::models::ScrapeBatch;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to start scraper process '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Scraper process timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Scraper process exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Scraper output is not a valid envelope: {message}")]
    Unparsable { message: String, output: String },

    #[error("Scraper reported failure: {0}")]
    Scraper(String),
}

/// Spawns the wrapper binary once per request
#[derive(Debug, Clone)]
pub struct ScraperProcess {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ScraperProcess {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.program.clone(), Duration::from_secs(config.timeout_seconds))
    }

    /// Arguments placed before `max_jobs` on every invocation
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run one scrape and return the envelope, whatever it reports
    pub async fn invoke(&self, max_jobs: usize) -> Result<ScrapeEnvelope, BridgeError> {
        let program = self.program.display().to_string();
        debug!(program = %program, max_jobs, "Spawning scraper process");

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(max_jobs.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the pending wait kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| BridgeError::Spawn { program, source })?,
            Err(_) => {
                warn!(seconds = self.timeout.as_secs(), "Scraper process timed out, killed");
                return Err(BridgeError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(BridgeError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        ScrapeEnvelope::from_line(line).map_err(|e| BridgeError::Unparsable {
            message: e.to_string(),
            output: stdout.to_string(),
        })
    }

    /// Run one scrape; an in-payload failure becomes [`BridgeError::Scraper`]
    pub async fn scrape(&self, max_jobs: usize) -> Result<ScrapeBatch, BridgeError> {
        let envelope = self.invoke(max_jobs).await?;
        if !envelope.success {
            return Err(BridgeError::Scraper(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        info!("Scraper returned {} jobs", envelope.count);
        Ok(ScrapeBatch::new(envelope.jobs))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout: Duration) -> ScraperProcess {
        // `sh -c script name arg` binds max_jobs to $1
        ScraperProcess::new("sh", timeout).with_args(["-c", script, "run-scraper"])
    }

    #[tokio::test]
    async fn test_successful_empty_batch() {
        let process = shell(
            r#"echo "starting" >&2; echo '{"success":true,"jobs":[],"count":0}'"#,
            Duration::from_secs(10),
        );

        let batch = process.scrape(20).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_max_jobs_is_passed_through() {
        let process = shell(
            r#"test "$1" = "7" && echo '{"success":true,"jobs":[],"count":0}'"#,
            Duration::from_secs(10),
        );

        assert!(process.invoke(7).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_in_payload_failure() {
        let process = shell(
            r#"echo '{"success":false,"error":"Browser session could not be opened","jobs":[],"count":0}'"#,
            Duration::from_secs(10),
        );

        let envelope = process.invoke(20).await.unwrap();
        assert!(!envelope.success);

        match process.scrape(20).await {
            Err(BridgeError::Scraper(message)) => assert!(message.contains("could not be opened")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let process = shell("sleep 5", Duration::from_millis(200));

        match process.invoke(20).await {
            Err(BridgeError::Timeout { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let process = shell("echo boom >&2; exit 3", Duration::from_secs(10));

        match process.invoke(20).await {
            Err(BridgeError::NonZeroExit { code, stderr }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparsable_output() {
        let process = shell("echo 'not json'", Duration::from_secs(10));

        assert!(matches!(
            process.invoke(20).await,
            Err(BridgeError::Unparsable { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let process = ScraperProcess::new("/nonexistent/run-scraper", Duration::from_secs(1));
        assert!(matches!(process.invoke(20).await, Err(BridgeError::Spawn { .. })));
    }
}
