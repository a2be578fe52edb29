//! Subscription registry and dispatch
//!
//! Subscribers are held in an ordered id→callback map; ids are strictly
//! increasing and never reused within a session. Each publish iterates a
//! defensive snapshot of the map in registration order, so subscribing or
//! unsubscribing from inside a callback cannot deadlock or skip peers.
//! A panicking subscriber is confined to its own invocation.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use parking_lot::RwLock;

use super::metrics::EventBusMetrics;
use super::types::{PageCallback, PageEvent};
use crate::errors::CrawlResult;
use crate::page::Page;

/// Event bus for per-page events
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<BTreeMap<u64, PageCallback>>,
    next_id: AtomicU64,
    metrics: EventBusMetrics,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback and return its subscription id
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(CrawlResult<PageEvent>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.write();
        subscribers.insert(id, Arc::new(callback));
        self.metrics.update_subscriber_count(subscribers.len());
        id
    }

    /// Remove one subscriber; `false` when the id is unknown
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.write();
        let removed = subscribers.remove(&id).is_some();
        self.metrics.update_subscriber_count(subscribers.len());
        removed
    }

    /// Remove all subscribers; `false` when there were none
    pub fn unsubscribe_all(&self) -> bool {
        let mut subscribers = self.subscribers.write();
        let had_any = !subscribers.is_empty();
        subscribers.clear();
        self.metrics.update_subscriber_count(0);
        had_any
    }

    /// Deliver a page to every subscriber in registration order.
    ///
    /// The subscriber map is snapshotted before delivery; callbacks run
    /// outside the lock. One subscriber's panic is recorded and does not
    /// reach the others or the crawl loop.
    pub fn publish(&self, page: &Page) {
        let snapshot: Vec<(u64, PageCallback)> = {
            let subscribers = self.subscribers.read();
            subscribers
                .iter()
                .map(|(id, cb)| (*id, Arc::clone(cb)))
                .collect()
        };
        self.metrics.record_publish();

        for (id, callback) in snapshot {
            let event = PageEvent::new(page.clone());
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(Ok(event))));
            match outcome {
                Ok(()) => self.metrics.record_delivery(),
                Err(_) => {
                    self.metrics.record_subscriber_failure();
                    warn!(
                        target: "arachne::events",
                        "subscriber {id} panicked during delivery; continuing"
                    );
                }
            }
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }

    #[must_use]
    pub fn metrics(&self) -> &EventBusMetrics {
        &self.metrics
    }
}
