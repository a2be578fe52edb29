//! Anchor extraction
//!
//! Turns fetched HTML into canonical absolute URLs: every `a[href]` is
//! resolved against the page URL, fragments are stripped, non-http(s)
//! schemes are dropped, and duplicates within the page are removed while
//! preserving discovery order. Scope filtering is not done here: callers
//! ledger every extracted link and let the frontier decide admission.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::utils::canonicalize_in;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Extract canonical outbound links from a page, in discovery order.
#[must_use]
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = canonicalize_in(base, href) else {
            continue;
        };
        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    }
    links
}
