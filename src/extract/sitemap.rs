//! Sitemap seeding
//!
//! A configured sitemap is fetched once at run start and every `<loc>`
//! entry is offered to the frontier through the normal admission path. The
//! extraction is a tolerant scan rather than a full XML parse: real-world
//! sitemaps are frequently malformed, and anything unparseable simply
//! yields no extra seeds.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::utils::canonicalize;

static LOC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").expect("static pattern"));

/// Extract canonical URLs from sitemap XML, in document order.
#[must_use]
pub fn extract_sitemap_urls(xml: &str) -> Vec<Url> {
    LOC_PATTERN
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .filter_map(|m| canonicalize(m.as_str()))
        .collect()
}
