use serde::{Deserialize, Serialize};

use crate::error::ScrapeResult;
use crate::models::{JobRecord, ScrapeBatch};

/// Single-line result document handed across the process boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    #[serde(default)]
    pub count: usize,
}

impl ScrapeEnvelope {
    pub fn success(batch: ScrapeBatch) -> Self {
        let jobs = batch.into_records();
        Self {
            success: true,
            error: None,
            count: jobs.len(),
            jobs,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            jobs: Vec::new(),
            count: 0,
        }
    }

    /// Compact JSON on one line
    pub fn to_line(&self) -> ScrapeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> ScrapeResult<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}
