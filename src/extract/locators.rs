//! Locator chains for job-board listing markup.
//!
//! Class names on the source page are outside our control, so each field is
//! probed through several candidates in priority order.

use async_trait::async_trait;

use crate::error::ScrapeResult;
use crate::scraper::ListingElement;
use crate::utils::StringUtils;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_TAGS: [&str; 3] = ["Actuarial", "Insurance", "Risk Management"];

/// Single best-effort title strategy; there is no secondary chain.
pub const TITLE_SELECTOR: &str = "h3, .job-title, [class*='title'], a[href*='/job/']";

pub const COMPANY_CHAIN: &[Locator] = &[
    Locator::Css(".company-name"),
    Locator::Css(".employer"),
    Locator::Css("[class*='company']"),
    Locator::Css("h4"),
    Locator::Css(".job-company"),
    Locator::Attribute { selector: "[data-company]", name: "data-company" },
];

pub const LOCATION_CHAIN: &[Locator] = &[
    Locator::Css(".location"),
    Locator::Css(".job-location"),
    Locator::Css("[class*='location']"),
    Locator::Attribute { selector: "[data-location]", name: "data-location" },
    Locator::Css(".city"),
    Locator::Css(".state"),
];

pub const JOB_TYPE_CHAIN: &[Locator] = &[
    Locator::Css(".job-type"),
    Locator::Css(".employment-type"),
    Locator::Css("[class*='type']"),
    Locator::Css(".full-time"),
    Locator::Css(".part-time"),
    Locator::Css(".contract"),
    Locator::Css(".intern"),
];

pub const POSTING_DATE_CHAIN: &[Locator] = &[
    Locator::Css(".date"),
    Locator::Css(".posted-date"),
    Locator::Css("[class*='date']"),
    Locator::Css(".time"),
    Locator::Attribute { selector: "[data-date]", name: "data-date" },
    Locator::Css(".posted"),
    Locator::Css("time"),
];

pub const TAG_SELECTORS: &[&str] = &[
    ".skills",
    ".tags",
    ".keywords",
    "[class*='skill']",
    ".badge",
    ".chip",
    ".tag",
    "[class*='tag']",
];

/// One strategy in a locator chain
#[async_trait(?Send)]
pub trait FieldProbe {
    /// Normalized non-empty text, or `None` when this strategy finds nothing usable.
    async fn probe(&self, element: &dyn ListingElement) -> ScrapeResult<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Text of the first element matching a CSS selector
    Css(&'static str),
    /// Text of the first match, falling back to the value of attribute `name`
    Attribute { selector: &'static str, name: &'static str },
}

impl Locator {
    pub fn selector(&self) -> &'static str {
        match self {
            Locator::Css(selector) => selector,
            Locator::Attribute { selector, .. } => selector,
        }
    }
}

#[async_trait(?Send)]
impl FieldProbe for Locator {
    async fn probe(&self, element: &dyn ListingElement) -> ScrapeResult<Option<String>> {
        let text = non_empty(element.first_text(self.selector()).await?);
        match self {
            Locator::Css(_) => Ok(text),
            Locator::Attribute { selector, name } => match text {
                Some(text) => Ok(Some(text)),
                None => Ok(non_empty(element.first_attribute(selector, name).await?)),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| StringUtils::normalize(&value))
        .filter(|value| !value.is_empty())
}
