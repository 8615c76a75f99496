use std::collections::HashSet;
use tracing::trace;

use super::locators::{DEFAULT_TAGS, TAG_SELECTORS};
use crate::scraper::ListingElement;
use crate::utils::StringUtils;

pub const MAX_TAGS: usize = 5;
/// Tags must be strictly shorter than this many characters.
pub const MAX_TAG_CHARS: usize = 50;

/// Collect skill/tag text across every tag-bearing locator.
pub async fn extract_tags(element: &dyn ListingElement) -> Vec<String> {
    let mut candidates = Vec::new();

    for selector in TAG_SELECTORS {
        match element.all_texts(selector).await {
            Ok(texts) => {
                candidates.extend(
                    texts
                        .iter()
                        .map(|text| StringUtils::normalize(text))
                        .filter(|text| !text.is_empty() && StringUtils::char_len(text) < MAX_TAG_CHARS),
                );
            }
            Err(e) => trace!(selector, error = %e, "Tag locator failed, skipping"),
        }
    }

    normalize_tags(candidates)
}

/// Keep the first `MAX_TAGS` candidates, drop duplicates, and fall back to the
/// default set when nothing survives.
pub fn normalize_tags(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let tags: Vec<String> = candidates
        .into_iter()
        .take(MAX_TAGS)
        .filter(|tag| seen.insert(tag.clone()))
        .collect();

    if tags.is_empty() {
        default_tags()
    } else {
        tags
    }
}

pub fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect()
}
