//! Discovered-links ledger
//!
//! Every link resolved by the extractor is recorded here, in discovery
//! order, whether or not it was later admitted for fetching. Duplicate
//! canonical URLs across pages are recorded once.

use std::collections::HashSet;

use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Inner {
    order: Vec<String>,
    seen: HashSet<String>,
}

/// Ordered, deduplicated ledger of discovered links
#[derive(Debug, Default)]
pub struct LinkLedger {
    inner: RwLock<Inner>,
}

impl LinkLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one canonical URL; `true` when it was new
    pub fn record(&self, url: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.seen.insert(url.to_string()) {
            inner.order.push(url.to_string());
            true
        } else {
            false
        }
    }

    /// Clone of the ledger in discovery order
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Return all links and empty the ledger; a second call immediately
    /// after returns nothing.
    pub fn drain(&self) -> Vec<String> {
        let mut inner = self.inner.write();
        inner.seen.clear();
        std::mem::take(&mut inner.order)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().order.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.order.clear();
        inner.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_discovery_order_without_duplicates() {
        let ledger = LinkLedger::new();
        assert!(ledger.record("https://example.com/b"));
        assert!(ledger.record("https://example.com/a"));
        assert!(!ledger.record("https://example.com/b"));
        assert_eq!(
            ledger.snapshot(),
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }

    #[test]
    fn drain_is_destructive() {
        let ledger = LinkLedger::new();
        ledger.record("https://example.com/a");
        let first = ledger.drain();
        assert_eq!(first.len(), 1);
        assert!(ledger.drain().is_empty());
        // after draining, the same URL may be recorded again
        assert!(ledger.record("https://example.com/a"));
    }
}
