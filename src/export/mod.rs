//! Output formats: the stdout envelope and the pretty JSON batch file.

pub mod envelope;
pub mod json_exporter;

pub use envelope::ScrapeEnvelope;
pub use json_exporter::{export_json, format_dump, load_json, ExportStats};
