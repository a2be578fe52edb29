//! Delivery metrics for the event bus

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters updated during publishing
#[derive(Debug, Default)]
pub struct EventBusMetrics {
    events_published: AtomicU64,
    deliveries: AtomicU64,
    subscriber_failures: AtomicU64,
    active_subscribers: AtomicUsize,
}

/// Consistent point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_published: u64,
    pub deliveries: u64,
    pub subscriber_failures: u64,
    pub active_subscribers: usize,
}

impl EventBusMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn record_publish(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_subscriber_failure(&self) {
        self.subscriber_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn update_subscriber_count(&self, count: usize) {
        self.active_subscribers.store(count, Ordering::Relaxed);
    }

    /// Individual reads are atomic but may be mutually inconsistent while
    /// publishing is in flight; use `snapshot()` for reporting.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_published: self.events_published.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            subscriber_failures: self.subscriber_failures.load(Ordering::Relaxed),
            active_subscribers: self.active_subscribers.load(Ordering::Relaxed),
        }
    }
}
