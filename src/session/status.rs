//! Session status and its transition rules

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a crawl session.
///
/// Within a run, transitions only move forward:
/// Idle → Running → {Stopping → Stopped | Completed | Failed}.
/// A new run (one-shot or cron tick) starts the cycle again from Running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrawlStatus {
    #[default]
    Idle,
    Running,
    Stopping,
    Completed,
    Stopped,
    Failed,
}

impl CrawlStatus {
    /// Completed, Stopped, or Failed
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    /// Running or Stopping
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Stopping => 2,
            Self::Completed | Self::Stopped | Self::Failed => 3,
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Shared status cell enforcing monotonic transitions within a run
#[derive(Debug, Default)]
pub struct StatusCell {
    inner: Mutex<CrawlStatus>,
}

impl StatusCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> CrawlStatus {
        *self.inner.lock()
    }

    /// Enter Running for a new run; `false` when a run is already active
    pub fn begin_run(&self) -> bool {
        let mut current = self.inner.lock();
        if current.is_active() {
            return false;
        }
        *current = CrawlStatus::Running;
        true
    }

    /// Move forward to `to`; transitions backward or sideways are ignored.
    /// Returns whether the transition was applied.
    pub fn advance(&self, to: CrawlStatus) -> bool {
        let mut current = self.inner.lock();
        if to.rank() > current.rank() {
            *current = to;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_monotonic_within_a_run() {
        let cell = StatusCell::new();
        assert!(cell.begin_run());
        assert!(cell.advance(CrawlStatus::Stopping));
        assert!(!cell.advance(CrawlStatus::Running));
        assert!(cell.advance(CrawlStatus::Stopped));
        assert!(!cell.advance(CrawlStatus::Completed));
        assert_eq!(cell.get(), CrawlStatus::Stopped);
    }

    #[test]
    fn begin_run_restarts_from_terminal_only() {
        let cell = StatusCell::new();
        assert!(cell.begin_run());
        assert!(!cell.begin_run());
        cell.advance(CrawlStatus::Completed);
        assert!(cell.begin_run());
        assert_eq!(cell.get(), CrawlStatus::Running);
    }

    #[test]
    fn running_to_completed_skips_stopping() {
        let cell = StatusCell::new();
        cell.begin_run();
        assert!(cell.advance(CrawlStatus::Completed));
        assert!(cell.get().is_terminal());
    }
}
