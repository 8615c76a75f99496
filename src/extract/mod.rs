//! Heuristic field extraction from one listing element.

pub mod field;
pub mod locators;
pub mod tags;

pub use field::{extract_field, extract_job_type, extract_title, first_match, probe_posting_date};
pub use locators::{FieldProbe, Locator};
pub use tags::extract_tags;

use tracing::trace;

use crate::error::ScrapeResult;
use crate::models::ExtractedFields;
use crate::scraper::ListingElement;
use locators::{COMPANY_CHAIN, DEFAULT_LOCATION, LOCATION_CHAIN, UNKNOWN_COMPANY};

/// Extract every display field of a listing.
///
/// Only a failing title query is an error; every other field degrades to its default.
pub async fn extract_listing(element: &dyn ListingElement) -> ScrapeResult<ExtractedFields> {
    let title = extract_title(element).await?;
    let company = extract_field(element, COMPANY_CHAIN, UNKNOWN_COMPANY).await;
    let location = extract_field(element, LOCATION_CHAIN, DEFAULT_LOCATION).await;
    let job_type = extract_job_type(element).await;

    // Posting dates stay at capture time; the page text is only observed
    if let Some(raw_date) = probe_posting_date(element).await {
        trace!(raw_date = %raw_date, "Posting date text present, using capture time");
    }

    let tags = extract_tags(element).await;

    Ok(ExtractedFields {
        title,
        company,
        location,
        job_type,
        tags,
    })
}
