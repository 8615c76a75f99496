use tracing::trace;

use super::locators::{FieldProbe, JOB_TYPE_CHAIN, POSTING_DATE_CHAIN, TITLE_SELECTOR, UNKNOWN_TITLE};
use crate::error::ScrapeResult;
use crate::models::JobType;
use crate::scraper::ListingElement;
use crate::utils::StringUtils;

/// First non-empty value produced by `chain`, or `None`.
///
/// A failing strategy (missing element, stale handle) only moves on to the next one.
pub async fn first_match<P: FieldProbe>(element: &dyn ListingElement, chain: &[P]) -> Option<String> {
    for (position, probe) in chain.iter().enumerate() {
        match probe.probe(element).await {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(e) => trace!(position, error = %e, "Locator failed, trying next"),
        }
    }
    None
}

/// Evaluate a locator chain with a terminal default
pub async fn extract_field<P: FieldProbe>(element: &dyn ListingElement, chain: &[P], default: &str) -> String {
    first_match(element, chain)
        .await
        .unwrap_or_else(|| default.to_string())
}

/// Title from the single title strategy.
///
/// A missing or blank title yields the sentinel. A query error is returned,
/// which makes the whole listing unusable.
pub async fn extract_title(element: &dyn ListingElement) -> ScrapeResult<String> {
    let title = element
        .first_text(TITLE_SELECTOR)
        .await?
        .map(|text| StringUtils::normalize(&text))
        .filter(|text| !text.is_empty());

    Ok(title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()))
}

pub async fn extract_job_type(element: &dyn ListingElement) -> JobType {
    first_match(element, JOB_TYPE_CHAIN)
        .await
        .map(|raw| JobType::from_raw(&raw))
        .unwrap_or_default()
}

/// Raw posting-date text, if any date-like element exists. The text is not parsed.
pub async fn probe_posting_date(element: &dyn ListingElement) -> Option<String> {
    first_match(element, POSTING_DATE_CHAIN).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::extract::locators::{COMPANY_CHAIN, LOCATION_CHAIN, UNKNOWN_COMPANY};
    use crate::scraper::static_page::StaticElement;
    use async_trait::async_trait;

    /// Delegates to a fixture but fails every query for one selector
    struct BrokenSelector {
        broken: &'static str,
        inner: StaticElement,
    }

    #[async_trait(?Send)]
    impl ListingElement for BrokenSelector {
        async fn first_text(&self, selector: &str) -> ScrapeResult<Option<String>> {
            if selector == self.broken {
                return Err(ScrapeError::StaleElement);
            }
            self.inner.first_text(selector).await
        }

        async fn all_texts(&self, selector: &str) -> ScrapeResult<Vec<String>> {
            self.inner.all_texts(selector).await
        }

        async fn first_attribute(&self, selector: &str, name: &str) -> ScrapeResult<Option<String>> {
            self.inner.first_attribute(selector, name).await
        }
    }

    #[tokio::test]
    async fn test_first_locator_with_text_wins() {
        let element = StaticElement::new(
            r#"<div><span class="employer">Beta Mutual</span><span class="company-name">Acme Re</span></div>"#,
        );
        assert_eq!(extract_field(&element, COMPANY_CHAIN, UNKNOWN_COMPANY).await, "Acme Re");
    }

    #[tokio::test]
    async fn test_blank_match_falls_through() {
        let element = StaticElement::new(
            r#"<div><span class="company-name">   </span><h4> Gamma  Life </h4></div>"#,
        );
        assert_eq!(extract_field(&element, COMPANY_CHAIN, UNKNOWN_COMPANY).await, "Gamma Life");
    }

    #[tokio::test]
    async fn test_missing_company_uses_sentinel() {
        let element = StaticElement::new(r#"<div><h3>Pricing Actuary</h3></div>"#);
        assert_eq!(extract_field(&element, COMPANY_CHAIN, UNKNOWN_COMPANY).await, "Unknown Company");
    }

    #[tokio::test]
    async fn test_data_attribute_value_used_when_text_empty() {
        let element = StaticElement::new(r#"<div><span data-location="Toronto, ON"></span></div>"#);
        assert_eq!(extract_field(&element, LOCATION_CHAIN, "Remote").await, "Toronto, ON");

        let element = StaticElement::new(r#"<div><span class="city">Des Moines</span></div>"#);
        assert_eq!(extract_field(&element, LOCATION_CHAIN, "Remote").await, "Des Moines");

        let element = StaticElement::new(r#"<div></div>"#);
        assert_eq!(extract_field(&element, LOCATION_CHAIN, "Remote").await, "Remote");
    }

    #[tokio::test]
    async fn test_failing_strategy_does_not_abort_field() {
        let element = BrokenSelector {
            broken: ".company-name",
            inner: StaticElement::new(r#"<div><span class="employer">Delta Re</span></div>"#),
        };
        assert_eq!(extract_field(&element, COMPANY_CHAIN, UNKNOWN_COMPANY).await, "Delta Re");
    }

    #[tokio::test]
    async fn test_title_sentinel_and_error() {
        let element = StaticElement::new(r#"<div><a href="/job/42"> Valuation Analyst </a></div>"#);
        assert_eq!(extract_title(&element).await.unwrap(), "Valuation Analyst");

        let element = StaticElement::new(r#"<div><p>no heading</p></div>"#);
        assert_eq!(extract_title(&element).await.unwrap(), "Unknown Title");

        let element = BrokenSelector {
            broken: TITLE_SELECTOR,
            inner: StaticElement::new(r#"<div><h3>Pricing Actuary</h3></div>"#),
        };
        assert!(extract_title(&element).await.is_err());
    }

    #[tokio::test]
    async fn test_job_type_is_always_enumerated() {
        let cases = [
            (r#"<div><span class="job-type">Part Time</span></div>"#, JobType::PartTime),
            (r#"<div><span class="employment-type">Contractor</span></div>"#, JobType::Contract),
            (r#"<div><span class="intern">Intern</span></div>"#, JobType::Internship),
            (r#"<div><span class="job-type">Temporary / Seasonal</span></div>"#, JobType::FullTime),
            (r#"<div></div>"#, JobType::FullTime),
        ];

        for (html, expected) in cases {
            let element = StaticElement::new(html);
            assert_eq!(extract_job_type(&element).await, expected, "{}", html);
        }
    }

    #[tokio::test]
    async fn test_posting_date_text_is_probed_not_parsed() {
        let element = StaticElement::new(r#"<div><time datetime="2024-01-15">3 days ago</time></div>"#);
        assert_eq!(probe_posting_date(&element).await.as_deref(), Some("3 days ago"));

        let element = StaticElement::new(r#"<div></div>"#);
        assert!(probe_posting_date(&element).await.is_none());
    }
}
