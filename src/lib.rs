//! jobscrape - job-listing extraction engine for actuarial job boards
//!
//! This library provides:
//! - Browser and static-HTML sessions behind one session interface
//! - Best-effort pagination expansion
//! - Heuristic field extraction with per-field fallback chains
//! - Record assembly, JSON export, and the stdout envelope
//! - A caller-side bridge that runs the scraper as a subprocess

pub mod args;
pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod extract;
pub mod logging;
pub mod models;
pub mod scraper;
pub mod utils;

// Re-export main types for convenience
pub use crate::bridge::{BridgeError, ScraperProcess};
pub use crate::config::AppConfig;
pub use crate::core::JobScraper;
pub use crate::error::{ScrapeError, ScrapeResult};
pub use crate::export::ScrapeEnvelope;
pub use crate::models::{JobRecord, JobType, ScrapeBatch};
