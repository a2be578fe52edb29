//! The unit of crawl output: one fetched page.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("static selector"));

/// Result of one fetch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Final URL of the response, after any followed redirects
    pub url: String,
    /// Response body decoded as UTF-8
    pub content: String,
    /// HTTP status code (rendering fetches report 200 on success)
    pub status_code: u16,
    /// Undecoded body bytes, captured only when raw content is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<Vec<u8>>,
    /// Response headers, when the transport exposed them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// The HTML `<title>` of the page, or empty when absent
    #[must_use]
    pub fn title(&self) -> String {
        let fragment = Html::parse_document(&self.content);
        match fragment.select(&TITLE_SELECTOR).next() {
            Some(title) => title.inner_html(),
            _ => String::new(),
        }
    }
}

/// Convert response headers into a plain string map, skipping
/// values that are not valid UTF-8.
pub(crate) fn header_map_to_hash_map(
    headers: &reqwest::header::HeaderMap,
) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (key, value) in headers {
        if let Ok(value) = value.to_str() {
            map.insert(key.as_str().to_string(), value.to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_extracted_from_document() {
        let page = Page {
            url: "https://example.com".into(),
            content: "<html><head><title>Hello</title></head><body></body></html>".into(),
            status_code: 200,
            ..Default::default()
        };
        assert_eq!(page.title(), "Hello");
    }

    #[test]
    fn title_empty_when_missing() {
        let page = Page {
            content: "<html><body>no title here</body></html>".into(),
            ..Default::default()
        };
        assert_eq!(page.title(), "");
    }
}
