//! Event payload and callback types

use std::sync::Arc;

use crate::errors::CrawlResult;
use crate::page::Page;

/// One successfully fetched page, delivered to subscribers
#[derive(Debug, Clone)]
pub struct PageEvent {
    pub page: Page,
}

impl PageEvent {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

/// Subscriber callback.
///
/// Receives `Ok(event)` per fetched page. The error slot exists for
/// interface symmetry with callers that surface delivery problems; the
/// engine itself never publishes failed fetches.
pub type PageCallback = Arc<dyn Fn(CrawlResult<PageEvent>) + Send + Sync>;
