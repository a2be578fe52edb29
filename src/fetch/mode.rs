//! Render-need heuristic for smart mode
//!
//! Smart mode fetches over plain HTTP first and escalates to the renderer
//! only when the response looks script-dependent: no extractable anchors
//! combined with either an explicit no-JavaScript marker or no visible
//! text at all. Pages that simply have no outbound links (plain articles,
//! terminal pages) do not escalate.

use scraper::Html;

use crate::extract::extract_links;
use crate::page::Page;
use crate::utils::canonicalize;

/// Whether a fetched page should be re-fetched through the renderer.
#[must_use]
pub fn needs_render(page: &Page) -> bool {
    if page.content.trim().is_empty() {
        return true;
    }
    let Some(base) = canonicalize(&page.url) else {
        return false;
    };
    if !extract_links(&page.content, &base).is_empty() {
        return false;
    }

    let lowered = page.content.to_lowercase();
    if lowered.contains("<noscript") || lowered.contains("enable javascript") {
        return true;
    }
    visible_text(&page.content).is_empty()
}

/// Concatenated text nodes of the document, whitespace-trimmed.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> Page {
        Page {
            url: "https://example.com/app".into(),
            content: content.into(),
            status_code: 200,
            ..Default::default()
        }
    }

    #[test]
    fn empty_body_needs_render() {
        assert!(needs_render(&page("")));
        assert!(needs_render(&page("   ")));
    }

    #[test]
    fn script_shell_needs_render() {
        assert!(needs_render(&page(
            r#"<html><body><div id="app"></div><script src="/bundle.js"></script></body></html>"#
        )));
    }

    #[test]
    fn noscript_marker_needs_render() {
        assert!(needs_render(&page(
            "<html><body><noscript>Please enable JavaScript</noscript></body></html>"
        )));
    }

    #[test]
    fn page_with_links_does_not_escalate() {
        assert!(!needs_render(&page(
            r#"<html><body><a href="/next">next</a></body></html>"#
        )));
    }

    #[test]
    fn plain_article_does_not_escalate() {
        assert!(!needs_render(&page(
            "<html><body><p>A terminal page with prose but no links.</p></body></html>"
        )));
    }
}
