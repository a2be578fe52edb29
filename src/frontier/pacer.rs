//! Global dispatch pacing
//!
//! The frontier is the single point at which request pacing is enforced:
//! no URL may be handed to a fetch task before the configured delay has
//! elapsed since the previous dispatch. The pacer makes an immediate
//! Allow/Deny decision and never sleeps itself; callers sleep on Deny.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Pacing decision for a dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceDecision {
    /// Dispatch now; the slot has been reserved
    Allow,
    /// Too soon; retry after the contained duration
    Deny { retry_after: Duration },
}

/// Enforces a minimum interval between dispatches
#[derive(Debug)]
pub struct DispatchPacer {
    delay: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl DispatchPacer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Try to reserve a dispatch slot.
    ///
    /// On `Allow` the slot is consumed atomically, so concurrent callers
    /// cannot both dispatch inside one delay window.
    pub fn check(&self) -> PaceDecision {
        if self.delay.is_zero() {
            return PaceDecision::Allow;
        }
        let mut last = self.last_dispatch.lock();
        let now = Instant::now();
        match *last {
            Some(prev) => {
                let elapsed = now.duration_since(prev);
                if elapsed >= self.delay {
                    *last = Some(now);
                    PaceDecision::Allow
                } else {
                    PaceDecision::Deny {
                        retry_after: self.delay - elapsed,
                    }
                }
            }
            None => {
                *last = Some(now);
                PaceDecision::Allow
            }
        }
    }

    /// Wait until a dispatch slot is available
    pub async fn acquire(&self) {
        loop {
            match self.check() {
                PaceDecision::Allow => return,
                PaceDecision::Deny { retry_after } => tokio::time::sleep(retry_after).await,
            }
        }
    }
}
