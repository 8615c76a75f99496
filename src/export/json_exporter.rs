use serde_json::to_writer_pretty;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::ScrapeBatch;

pub const DUMP_START: &str = "=== SCRAPED JOBS JSON ===";
pub const DUMP_END: &str = "=== END SCRAPED JOBS ===";

/// Size of a written export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    pub record_count: usize,
    pub file_size_bytes: u64,
}

/// Write the batch as a pretty-printed JSON array
pub async fn export_json(batch: &ScrapeBatch, output_path: &Path) -> ScrapeResult<ExportStats> {
    debug!("Exporting {} records to JSON: {}", batch.len(), output_path.display());

    if let Some(parent) = output_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file = File::create(output_path)
        .map_err(|e| ScrapeError::export(format!("cannot create {}: {}", output_path.display(), e)))?;
    to_writer_pretty(BufWriter::new(file), batch)?;

    let file_size = tokio::fs::metadata(output_path).await?.len();

    info!("JSON export completed: {} records, {} bytes", batch.len(), file_size);

    Ok(ExportStats {
        record_count: batch.len(),
        file_size_bytes: file_size,
    })
}

/// Read back a file written by [`export_json`]
pub async fn load_json(path: &Path) -> ScrapeResult<ScrapeBatch> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Human-readable dump framed by sentinel lines
pub fn format_dump(batch: &ScrapeBatch) -> ScrapeResult<String> {
    let body = serde_json::to_string_pretty(batch)?;
    Ok(format!("{}\n{}\n{}", DUMP_START, body, DUMP_END))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedFields, IdStrategy, JobType, RecordAssembler};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_batch() -> ScrapeBatch {
        let mut assembler = RecordAssembler::new(Utc::now(), IdStrategy::Sequential, "ActuaryList.com");
        let records = vec![
            assembler.assemble(ExtractedFields {
                title: "Senior Pricing Actuary".to_string(),
                company: "Acme Reinsurance".to_string(),
                location: "Hartford, CT".to_string(),
                job_type: JobType::Contract,
                tags: vec!["GLM".to_string(), "Python".to_string()],
            }),
            assembler.assemble(ExtractedFields {
                title: "Unknown Title".to_string(),
                company: "Unknown Company".to_string(),
                location: "Remote".to_string(),
                job_type: JobType::FullTime,
                tags: vec!["Actuarial".to_string()],
            }),
        ];
        ScrapeBatch::new(records)
    }

    #[tokio::test]
    async fn test_export_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out").join("scraped_jobs.json");
        let batch = sample_batch();

        let stats = export_json(&batch, &output_path).await.unwrap();
        assert_eq!(stats.record_count, 2);
        assert!(stats.file_size_bytes > 0);

        let reloaded = load_json(&output_path).await.unwrap();
        assert_eq!(reloaded, batch);

        let raw = std::fs::read_to_string(&output_path).unwrap();
        assert!(raw.contains("\"job_type\": \"Contract\""));
    }

    #[tokio::test]
    async fn test_empty_batch_exports_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("empty.json");

        export_json(&ScrapeBatch::default(), &output_path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "[]");
    }

    #[test]
    fn test_dump_is_framed() {
        let dump = format_dump(&sample_batch()).unwrap();
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.first(), Some(&DUMP_START));
        assert_eq!(lines.last(), Some(&DUMP_END));
        assert!(dump.contains("Senior Pricing Actuary"));
    }
}
