//! Normalized job records and the assembler that builds them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Employment type of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Internship")]
    Internship,
}

impl JobType {
    /// Map free-form employment text onto the four known types.
    ///
    /// Checks run in a fixed order, so "part-time contract" maps to part-time.
    pub fn from_raw(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("part") {
            Self::PartTime
        } else if text.contains("contract") {
            Self::Contract
        } else if text.contains("intern") {
            Self::Internship
        } else {
            Self::FullTime
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "Full-time"),
            JobType::PartTime => write!(f, "Part-time"),
            JobType::Contract => write!(f, "Contract"),
            JobType::Internship => write!(f, "Internship"),
        }
    }
}

/// The canonical output unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub posting_date: DateTime<Utc>,
    pub description: String,
}

/// Ordered records produced by one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeBatch {
    records: Vec<JobRecord>,
}

impl ScrapeBatch {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }
}

/// Field values pulled from one listing element
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub tags: Vec<String>,
}

/// How record ids are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `scraped_<capture seconds>_<position in batch>`
    #[default]
    Sequential,
    /// `scraped_<sha256 prefix of title|company|location>`
    ContentHash,
}

/// Builds `JobRecord`s for a single batch.
///
/// Ids are unique within the batch for either strategy; they carry no
/// identity across runs.
pub struct RecordAssembler {
    captured_at: DateTime<Utc>,
    strategy: IdStrategy,
    source_name: String,
    assembled: usize,
    hash_counts: HashMap<String, usize>,
}

impl RecordAssembler {
    pub fn new(captured_at: DateTime<Utc>, strategy: IdStrategy, source_name: impl Into<String>) -> Self {
        Self {
            captured_at,
            strategy,
            source_name: source_name.into(),
            assembled: 0,
            hash_counts: HashMap::new(),
        }
    }

    pub fn assemble(&mut self, fields: ExtractedFields) -> JobRecord {
        let id = self.next_id(&fields);
        self.assembled += 1;

        let description = format!(
            "Actuarial position at {} in {}. This job was scraped from {}.",
            fields.company, fields.location, self.source_name
        );

        JobRecord {
            id,
            title: fields.title,
            company: fields.company,
            location: fields.location,
            job_type: fields.job_type,
            tags: fields.tags,
            posting_date: self.captured_at,
            description,
        }
    }

    fn next_id(&mut self, fields: &ExtractedFields) -> String {
        match self.strategy {
            IdStrategy::Sequential => {
                format!("scraped_{}_{}", self.captured_at.timestamp(), self.assembled)
            }
            IdStrategy::ContentHash => {
                let mut hasher = Sha256::new();
                hasher.update(fields.title.as_bytes());
                hasher.update(b"|");
                hasher.update(fields.company.as_bytes());
                hasher.update(b"|");
                hasher.update(fields.location.as_bytes());
                let digest = hex::encode(hasher.finalize());
                let base = format!("scraped_{}", &digest[..16]);

                let seen = self.hash_counts.entry(base.clone()).or_insert(0);
                *seen += 1;
                if *seen == 1 {
                    base
                } else {
                    format!("{}-{}", base, *seen)
                }
            }
        }
    }
}
