//! URL canonicalization
//!
//! The canonical string form of a URL is the dedup identity for the whole
//! engine: the visited set, the frontier, the link ledger, and the budget
//! counters all key on it. Canonicalization must therefore be applied at
//! every point a URL enters the system.

use url::Url;

/// Canonicalize an absolute URL string.
///
/// The parser already lowercases scheme and host and strips default ports;
/// on top of that the fragment is removed, since `#section` anchors are
/// client-side navigation and never distinct HTTP resources.
///
/// Returns `None` for unparseable input or non-http(s) schemes.
#[must_use]
pub fn canonicalize(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Canonicalize a possibly-relative reference against a base page URL.
///
/// `href` values like `/docs`, `../a`, or `page.html` resolve against the
/// page they were found on; absolute references resolve the same way via
/// `Url::join`.
#[must_use]
pub fn canonicalize_in(base: &Url, reference: &str) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut url = base.join(trimmed).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Host with any leading `www.` label removed, trailing dot trimmed.
///
/// Used by scope checks so `www.example.com` and `example.com` compare
/// equal, matching how site owners serve one site from both names.
#[must_use]
pub fn registrable_stem(host: &str) -> &str {
    let host = host.trim_end_matches('.');
    host.strip_prefix("www.").unwrap_or(host)
}
