//! The session type: one website, its configuration, and its runs
//!
//! A `Website` is created with a seed URL, configured with a
//! [`CrawlConfig`] value (last write wins until a run starts), and then
//! driven through `crawl`, `scrape`, or `crawl_smart`, foreground or
//! background, any number of times. Ledgers, subscriptions, and status
//! persist across runs until explicitly cleared.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::engine::{self, RunContext};
use super::state::SessionState;
use super::status::CrawlStatus;
use crate::config::{CrawlConfig, SessionConfig};
use crate::errors::{CrawlResult, CrawlError};
use crate::events::PageEvent;
use crate::fetch::{FetchMode, Renderer};
use crate::page::Page;
use crate::schedule::CronHandle;
use crate::store;
use crate::utils::canonicalize;

/// A crawl session bound to one seed URL
pub struct Website {
    seed: String,
    config: CrawlConfig,
    built: Mutex<Option<Arc<SessionConfig>>>,
    state: Arc<SessionState>,
    renderer: Option<Arc<dyn Renderer>>,
    /// Background run handles by run id; ids are monotonic per session
    handles: Mutex<BTreeMap<u32, JoinHandle<()>>>,
}

impl Website {
    /// Create a session for a seed URL with default configuration
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            seed: url.to_string(),
            config: CrawlConfig::default(),
            built: Mutex::new(None),
            state: Arc::new(SessionState::new()),
            renderer: None,
            handles: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the configuration. May be called any number of times before
    /// a run starts; the latest value wins and invalidates any built
    /// snapshot.
    #[must_use]
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Replace the configuration in place (last write wins)
    pub fn set_config(&mut self, config: CrawlConfig) {
        self.config = config;
        *self.built.lock() = None;
    }

    /// Current configuration value
    #[must_use]
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Mutable access to the configuration; invalidates any built snapshot
    pub fn config_mut(&mut self) -> &mut CrawlConfig {
        *self.built.lock() = None;
        &mut self.config
    }

    /// Substitute the rendering transport (used by smart and headless
    /// runs). Primarily a test seam; the default is the Chromium renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Finalize the current configuration into an immutable snapshot.
    ///
    /// Optional: runs build implicitly from the configuration in effect at
    /// call time. Calling it early surfaces configuration errors before
    /// any run starts.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] for an invalid seed URL,
    /// regex, header, proxy, budget, or cron expression.
    pub fn build(&self) -> CrawlResult<()> {
        let snapshot = Arc::new(SessionConfig::build(&self.seed, &self.config)?);
        *self.built.lock() = Some(snapshot);
        Ok(())
    }

    fn snapshot(&self) -> CrawlResult<Arc<SessionConfig>> {
        let mut built = self.built.lock();
        if let Some(snapshot) = built.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(SessionConfig::build(&self.seed, &self.config)?);
        *built = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Current session status
    #[must_use]
    pub fn status(&self) -> CrawlStatus {
        self.state.status.get()
    }

    /// Register a page-event callback; ids are strictly increasing and
    /// never reused within the session
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(CrawlResult<PageEvent>) + Send + Sync + 'static,
    {
        self.state.bus.subscribe(callback)
    }

    /// Remove one subscription, or all when no id is given.
    /// Returns `false` for an unmatched id.
    pub fn unsubscribe(&self, id: Option<u64>) -> bool {
        match id {
            Some(id) => self.state.bus.unsubscribe(id),
            None => self.state.bus.unsubscribe_all(),
        }
    }

    /// Crawl the site: discover links and deliver events; pages are not
    /// retained. `headless` selects the rendering transport instead of
    /// plain HTTP. With `background`, returns a run id immediately and the
    /// run proceeds under internal scheduling.
    ///
    /// # Errors
    ///
    /// Configuration errors surface here when no snapshot was built yet.
    /// Fetch failures never error the call; inspect [`Website::status`].
    pub async fn crawl(&self, background: bool, headless: bool) -> CrawlResult<Option<u32>> {
        let mode = if headless { FetchMode::Chrome } else { FetchMode::Http };
        self.start(mode, false, background).await
    }

    /// Crawl and additionally retain every visited page for
    /// [`Website::pages`]
    ///
    /// # Errors
    ///
    /// Same contract as [`Website::crawl`].
    pub async fn scrape(&self, background: bool, headless: bool) -> CrawlResult<Option<u32>> {
        let mode = if headless { FetchMode::Chrome } else { FetchMode::Http };
        self.start(mode, true, background).await
    }

    /// Crawl with adaptive transport: HTTP first, escalating to rendering
    /// per URL when the content needs it
    ///
    /// # Errors
    ///
    /// Same contract as [`Website::crawl`].
    pub async fn crawl_smart(&self, background: bool) -> CrawlResult<Option<u32>> {
        self.start(FetchMode::Smart, false, background).await
    }

    async fn start(
        &self,
        mode: FetchMode,
        retain: bool,
        background: bool,
    ) -> CrawlResult<Option<u32>> {
        let ctx = RunContext {
            snapshot: self.snapshot()?,
            state: Arc::clone(&self.state),
            renderer: self.renderer.clone(),
            mode,
            retain,
        };
        if background {
            let mut handles = self.handles.lock();
            let id = match handles.last_key_value() {
                Some((last, _)) => last + 1,
                None => 0,
            };
            handles.insert(id, tokio::spawn(engine::run(ctx)));
            Ok(Some(id))
        } else {
            engine::run(ctx).await;
            Ok(None)
        }
    }

    /// Request cooperative cancellation.
    ///
    /// With a run id, only a matching background run is stopped; an
    /// unmatched id is a no-op returning `false`. Without an id, every run
    /// of this session is cancelled. The flag stops dispatch immediately;
    /// aborting recorded handles is a backstop for wedged runs, and the
    /// status is forced terminal so callers polling it always converge.
    pub fn stop(&self, id: Option<u32>) -> bool {
        match id {
            Some(id) => {
                let Some(handle) = self.handles.lock().remove(&id) else {
                    return false;
                };
                debug!(target: "arachne::session", "stopping run {id}");
                self.request_stop(vec![handle]);
                true
            }
            None => {
                let handles: Vec<_> = {
                    let mut map = self.handles.lock();
                    std::mem::take(&mut *map).into_values().collect()
                };
                let had_active = self.state.status.get().is_active() || !handles.is_empty();
                self.request_stop(handles);
                had_active
            }
        }
    }

    fn request_stop(&self, handles: Vec<JoinHandle<()>>) {
        self.state.cancel.cancel();
        let had_runs = self.state.status.get().is_active() || !handles.is_empty();
        for handle in &handles {
            handle.abort();
        }
        if had_runs {
            // force the terminal state in case an aborted run never got to
            // record it; a naturally finishing run wins the race harmlessly
            self.state.status.advance(CrawlStatus::Stopping);
            self.state.status.advance(CrawlStatus::Stopped);
            self.state.apply_deferred_clear();
        }
    }

    /// All links discovered this session, in discovery order
    #[must_use]
    pub fn links(&self) -> Vec<String> {
        self.state.links.snapshot()
    }

    /// Drain all links from storing; a second call returns empty
    pub fn drain_links(&self) -> Vec<String> {
        self.state.links.drain()
    }

    /// Pages retained by scrape runs
    #[must_use]
    pub fn pages(&self) -> Vec<Page> {
        self.state.pages.snapshot()
    }

    /// Number of pages visited this session. During a background run the
    /// value trails the crawl.
    #[must_use]
    pub fn size(&self) -> usize {
        self.state.visited.len()
    }

    /// Clear links, pages, and visited state without touching the
    /// configuration. While a run is active the clear is deferred and
    /// applied atomically once the session leaves the Running state.
    pub fn clear(&self) {
        if self.state.status.get().is_active() {
            self.state
                .clear_requested
                .store(true, std::sync::atomic::Ordering::SeqCst);
        } else {
            self.state.apply_clear();
        }
    }

    /// Store a record in the ad hoc data channel
    pub fn push_data(&self, record: serde_json::Value) {
        self.state.records.push(record);
    }

    /// Read all ad hoc records as a JSON array
    #[must_use]
    pub fn read_data(&self) -> serde_json::Value {
        self.state.records.read()
    }

    /// Clear only the ad hoc data channel
    pub fn clear_data(&self) {
        self.state.records.clear();
    }

    /// Export retained pages as JSONL. Defaults to
    /// `./storage/<seed-host>.jsonl`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Io`] when the destination cannot be written.
    pub async fn export_jsonl_data(&self, export_path: Option<PathBuf>) -> CrawlResult<PathBuf> {
        let stem = canonicalize(&self.seed)
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "export".to_string());
        store::export_jsonl(&self.state.pages.snapshot(), export_path, &stem).await
    }

    /// Register the configured cron schedule and return its handle.
    ///
    /// Each tick runs a crawl or scrape per the configured cron type; a
    /// tick that fires while the previous triggered run is still active is
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] when no cron expression is
    /// configured, or [`CrawlError::Schedule`] when the scheduler cannot
    /// start.
    pub async fn run_cron(&self) -> CrawlResult<CronHandle> {
        let snapshot = self.snapshot()?;
        if snapshot.config().cron_expr().is_none() {
            return Err(CrawlError::Configuration(
                "no cron expression configured; apply with_cron first".into(),
            ));
        }
        crate::schedule::start(snapshot, Arc::clone(&self.state), self.renderer.clone()).await
    }
}
