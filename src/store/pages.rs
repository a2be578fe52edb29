//! Retained-pages ledger
//!
//! Append-only store of pages kept by scrape runs. Readers during an
//! active run observe a point-in-time snapshot that may trail the crawl.

use parking_lot::RwLock;

use crate::page::Page;

/// Append-only ledger of retained pages
#[derive(Debug, Default)]
pub struct PageLedger {
    inner: RwLock<Vec<Page>>,
}

impl PageLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, page: Page) {
        self.inner.write().push(page);
    }

    /// Clone of the retained pages in retention order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Page> {
        self.inner.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> Page {
        Page {
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn retains_in_order() {
        let ledger = PageLedger::new();
        ledger.push(page("https://example.com/a"));
        ledger.push(page("https://example.com/b"));
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot[0].url, "https://example.com/a");
        assert_eq!(snapshot[1].url, "https://example.com/b");
    }

    #[test]
    fn clear_empties_the_ledger() {
        let ledger = PageLedger::new();
        ledger.push(page("https://example.com/a"));
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
