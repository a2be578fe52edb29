//! Scheduled runs
//!
//! Wraps the session engine in a cron scheduler: each tick triggers a run
//! with crawl or scrape semantics per the configured cron type. A tick
//! firing while the previous triggered run is still active is skipped, so
//! one schedule never overlaps itself.

use std::sync::Arc;

use log::{debug, info};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::{CronType, SessionConfig};
use crate::errors::{CrawlError, CrawlResult};
use crate::fetch::{FetchMode, Renderer};
use crate::session::engine::{self, RunContext};
use crate::session::state::SessionState;
use crate::utils::constants::CRON_DRAIN_POLL;

/// Handle for a registered schedule
pub struct CronHandle {
    scheduler: JobScheduler,
    state: Arc<SessionState>,
}

impl std::fmt::Debug for CronHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronHandle").finish_non_exhaustive()
    }
}

impl CronHandle {
    /// Deregister the schedule and resolve once any in-progress triggered
    /// run reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Schedule`] when scheduler shutdown fails.
    pub async fn stop(mut self) -> CrawlResult<()> {
        self.scheduler.shutdown().await.map_err(schedule_error)?;
        while self.state.status.get().is_active() {
            tokio::time::sleep(CRON_DRAIN_POLL).await;
        }
        info!(target: "arachne::schedule", "cron stopped");
        Ok(())
    }
}

/// Register the snapshot's cron expression and start ticking.
pub(crate) async fn start(
    snapshot: Arc<SessionConfig>,
    state: Arc<SessionState>,
    renderer: Option<Arc<dyn Renderer>>,
) -> CrawlResult<CronHandle> {
    let config = snapshot.config();
    let expr = config
        .cron_expr()
        .ok_or_else(|| CrawlError::Configuration("no cron expression configured".into()))?
        .to_string();
    let retain = config.cron_type() == CronType::Scrape;

    let scheduler = JobScheduler::new().await.map_err(schedule_error)?;

    let tick_snapshot = Arc::clone(&snapshot);
    let tick_state = Arc::clone(&state);
    let job = Job::new_async(expr.as_str(), move |_id, _scheduler| {
        let snapshot = Arc::clone(&tick_snapshot);
        let state = Arc::clone(&tick_state);
        let renderer = renderer.clone();
        Box::pin(async move {
            if state.status.get().is_active() {
                debug!(
                    target: "arachne::schedule",
                    "previous run still active, skipping tick"
                );
                return;
            }
            engine::run(RunContext {
                snapshot,
                state,
                renderer,
                mode: FetchMode::Http,
                retain,
            })
            .await;
        })
    })
    .map_err(schedule_error)?;

    scheduler.add(job).await.map_err(schedule_error)?;
    scheduler.start().await.map_err(schedule_error)?;
    info!(target: "arachne::schedule", "cron registered: {expr}");

    Ok(CronHandle { scheduler, state })
}

fn schedule_error(err: tokio_cron_scheduler::JobSchedulerError) -> CrawlError {
    CrawlError::Schedule(err.to_string())
}
