//! State shared between a session's owner, its runs, and its cron wrapper

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;
use tokio::sync::Notify;

use super::status::StatusCell;
use crate::events::EventBus;
use crate::store::{LinkLedger, PageLedger, RecordStore};

/// Cooperative cancellation: a flag checked at every suspension point of
/// the crawl loop, plus a notifier so waits can end early.
#[derive(Debug, Default)]
pub struct CancelFlag {
    flag: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves when `cancel` is called; pair with an `is_cancelled` check
    /// to cover signals raised before the wait began.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Re-arm before a new run
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Everything a run touches, shared behind one `Arc`.
///
/// The ledgers are mutated only by the owning session's workers;
/// concurrent external reads during a background run may observe a
/// partial snapshot.
#[derive(Default)]
pub struct SessionState {
    pub status: StatusCell,
    /// Canonical URLs dispatched for fetching this session
    pub visited: DashSet<String>,
    pub pages: PageLedger,
    pub links: LinkLedger,
    pub records: RecordStore,
    pub bus: EventBus,
    pub cancel: CancelFlag,
    /// A `clear()` arrived while Running; applied when the run ends
    pub clear_requested: AtomicBool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop retained pages, links, and visited state. The record store is
    /// a separate channel and is not touched.
    pub fn apply_clear(&self) {
        self.pages.clear();
        self.links.clear();
        self.visited.clear();
    }

    /// Apply a clear deferred from an active run, if one was requested
    pub fn apply_deferred_clear(&self) {
        if self.clear_requested.swap(false, Ordering::SeqCst) {
            self.apply_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_sticky_until_reset() {
        let flag = CancelFlag::default();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn deferred_clear_applies_once() {
        let state = SessionState::new();
        state.links.record("https://example.com/a");
        state.clear_requested.store(true, Ordering::SeqCst);
        state.apply_deferred_clear();
        assert!(state.links.is_empty());
        // flag was consumed
        assert!(!state.clear_requested.load(Ordering::SeqCst));
    }

    #[test]
    fn clear_leaves_records_alone() {
        let state = SessionState::new();
        state.records.push(serde_json::json!({"keep": true}));
        state.links.record("https://example.com/a");
        state.apply_clear();
        assert!(state.links.is_empty());
        assert_eq!(state.records.len(), 1);
    }
}
