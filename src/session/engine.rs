//! The crawl run loop
//!
//! One call to `run` drives a single session run to a terminal status:
//! seed the frontier, drain it through a bounded pool of fetch tasks,
//! route every extracted link through the ledger and the admission path,
//! and publish each fetched page to the event bus. Cancellation is
//! observed between dequeue and dispatch and again after every fetch
//! completion; it is authoritative for dispatch and advisory for work
//! already in flight.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::{Mutex, Semaphore};
use url::Url;

use super::state::SessionState;
use super::status::CrawlStatus;
use crate::config::SessionConfig;
use crate::errors::{CrawlError, CrawlResult, FetchErrorKind};
use crate::extract::{extract_links, extract_sitemap_urls};
use crate::fetch::{needs_render, ChromeRenderer, FetchMode, HttpFetcher, Renderer, RobotsGate};
use crate::frontier::{DispatchPacer, Frontier, QueuedUrl};
use crate::page::Page;
use crate::policy::PolicyGovernor;
use crate::utils::{canonicalize, canonicalize_in};

/// Everything one run needs, cloneable into background tasks
pub(crate) struct RunContext {
    pub snapshot: Arc<SessionConfig>,
    pub state: Arc<SessionState>,
    pub renderer: Option<Arc<dyn Renderer>>,
    pub mode: FetchMode,
    /// Retain every visited page in the page ledger (scrape semantics)
    pub retain: bool,
}

/// Drive one run to a terminal status.
///
/// Never returns an error: per-URL failures are recovered in place, and a
/// failed seed or unusable transport configuration is reported through the
/// session status so background and cron callers observe it the same way
/// foreground callers do.
pub(crate) async fn run(ctx: RunContext) {
    let state = Arc::clone(&ctx.state);
    state.cancel.reset();
    state.status.begin_run();

    let snapshot = Arc::clone(&ctx.snapshot);
    let config = snapshot.config();
    let seed = snapshot.seed().clone();
    info!(target: "arachne::engine", "starting run for {seed}");

    let fetcher = match HttpFetcher::new(&snapshot) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            error!(target: "arachne::engine", "transport setup failed: {e}");
            state.status.advance(CrawlStatus::Failed);
            state.apply_deferred_clear();
            return;
        }
    };
    let robots = config.respect_robots_txt().then(|| {
        Arc::new(RobotsGate::new(
            fetcher.client().clone(),
            config.user_agent().to_string(),
        ))
    });
    let renderer: Option<Arc<dyn Renderer>> = match ctx.mode {
        FetchMode::Http => None,
        FetchMode::Chrome | FetchMode::Smart => Some(
            ctx.renderer
                .clone()
                .unwrap_or_else(|| Arc::new(ChromeRenderer::new(&snapshot))),
        ),
    };

    // Seed the frontier; the seed goes through the same admission path as
    // every discovered link, so budget and blacklist apply to it too.
    let mut frontier = Frontier::new(PolicyGovernor::new(&snapshot));
    state.links.record(seed.as_str());
    let seed_verdict = frontier.enqueue(seed.clone(), 0);
    if !seed_verdict.is_admitted() {
        warn!(target: "arachne::engine", "seed not admitted ({seed_verdict:?}): {seed}");
    }

    if let Some(sitemap) = config.sitemap() {
        seed_from_sitemap(&fetcher, &seed, sitemap, &mut frontier, &state).await;
    }

    let frontier = Arc::new(Mutex::new(frontier));
    let pacer = DispatchPacer::new(Duration::from_millis(config.delay_ms()));
    let concurrency = config.concurrency().max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut active = FuturesUnordered::new();
    let mut seed_failed = false;
    let mut cancelled = false;

    loop {
        // fill the pool up to the concurrency limit
        while active.len() < concurrency {
            if state.cancel.is_cancelled() {
                break;
            }
            let item = { frontier.lock().await.next() };
            let Some(item) = item else { break };

            // global pacing point; a stop signal ends the wait early
            tokio::select! {
                () = pacer.acquire() => {}
                () = state.cancel.notified() => {}
            }
            if state.cancel.is_cancelled() {
                break;
            }

            if let Some(robots) = &robots {
                if !robots.allowed(&item.url).await {
                    continue;
                }
            }
            if !state.visited.insert(item.url.as_str().to_string()) {
                continue;
            }

            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                error!(target: "arachne::engine", "semaphore closed unexpectedly");
                break;
            };
            let fetcher = Arc::clone(&fetcher);
            let renderer = renderer.clone();
            let mode = ctx.mode;
            active.push(tokio::spawn(async move {
                let _permit = permit;
                let result = fetch_one(&fetcher, renderer.as_deref(), mode, &item).await;
                (item, result)
            }));
        }

        let Some(joined) = active.next().await else {
            break; // frontier drained and nothing in flight
        };

        match joined {
            Ok((item, Ok((page, links)))) => {
                debug!(
                    target: "arachne::engine",
                    "crawled [depth {}] {} ({} links)",
                    item.depth,
                    item.url,
                    links.len()
                );
                {
                    let mut frontier = frontier.lock().await;
                    for link in links {
                        // every discovered link is ledgered, admitted or not
                        state.links.record(link.as_str());
                        if !state.cancel.is_cancelled() {
                            frontier.enqueue(link, item.depth + 1);
                        }
                    }
                }
                if ctx.retain {
                    state.pages.push(page.clone());
                }
                state.bus.publish(&page);
            }
            Ok((item, Err(e))) => {
                warn!(target: "arachne::engine", "fetch failed: {e}");
                if item.depth == 0 {
                    seed_failed = true;
                }
            }
            Err(join_err) => {
                error!(target: "arachne::engine", "fetch task panicked: {join_err}");
            }
        }

        // observe cancellation after each fetch completion
        if state.cancel.is_cancelled() && !cancelled {
            cancelled = true;
            frontier.lock().await.drop_pending();
        }
    }

    if state.cancel.is_cancelled() {
        cancelled = true;
    }
    let final_status = if seed_failed {
        CrawlStatus::Failed
    } else if cancelled {
        CrawlStatus::Stopped
    } else {
        CrawlStatus::Completed
    };
    state.status.advance(final_status);
    state.apply_deferred_clear();
    info!(
        target: "arachne::engine",
        "run finished ({final_status}): {} visited, {} links",
        state.visited.len(),
        state.links.len()
    );
}

/// Fetch one URL in the selected mode and extract its outbound links.
async fn fetch_one(
    fetcher: &HttpFetcher,
    renderer: Option<&dyn Renderer>,
    mode: FetchMode,
    item: &QueuedUrl,
) -> CrawlResult<(Page, Vec<Url>)> {
    let page = match mode {
        FetchMode::Http => fetcher.fetch(&item.url).await?,
        FetchMode::Chrome => match renderer {
            Some(renderer) => renderer.render(item.url.clone()).await?,
            None => {
                return Err(CrawlError::fetch(
                    item.url.as_str(),
                    FetchErrorKind::Render("no renderer available".into()),
                ));
            }
        },
        FetchMode::Smart => smart_fetch(fetcher, renderer, item).await?,
    };

    let base = canonicalize(&page.url).unwrap_or_else(|| item.url.clone());
    let links = extract_links(&page.content, &base);
    Ok((page, links))
}

/// HTTP first; escalate to the renderer exactly once when the result
/// fails the render-need heuristic. A failed escalation keeps the HTTP
/// result rather than dropping the page.
async fn smart_fetch(
    fetcher: &HttpFetcher,
    renderer: Option<&dyn Renderer>,
    item: &QueuedUrl,
) -> CrawlResult<Page> {
    match fetcher.fetch(&item.url).await {
        Ok(page) if !needs_render(&page) => Ok(page),
        Ok(page) => match renderer {
            Some(renderer) => {
                debug!(target: "arachne::engine", "escalating to render: {}", item.url);
                match renderer.render(item.url.clone()).await {
                    Ok(rendered) => Ok(rendered),
                    Err(e) => {
                        warn!(
                            target: "arachne::engine",
                            "render escalation failed, keeping http result: {e}"
                        );
                        Ok(page)
                    }
                }
            }
            None => Ok(page),
        },
        // a blocked or erroring origin may still serve a rendered page
        Err(e @ CrawlError::Fetch { kind: FetchErrorKind::Status(_), .. }) => match renderer {
            Some(renderer) => renderer.render(item.url.clone()).await.or(Err(e)),
            None => Err(e),
        },
        Err(e) => Err(e),
    }
}

/// Fetch the configured sitemap once and offer every entry at depth 1.
async fn seed_from_sitemap(
    fetcher: &HttpFetcher,
    seed: &Url,
    sitemap: &str,
    frontier: &mut Frontier,
    state: &SessionState,
) {
    let Some(sitemap_url) = canonicalize_in(seed, sitemap) else {
        warn!(target: "arachne::engine", "unusable sitemap location: {sitemap}");
        return;
    };
    match fetcher.fetch(&sitemap_url).await {
        Ok(page) => {
            let entries = extract_sitemap_urls(&page.content);
            debug!(
                target: "arachne::engine",
                "sitemap {sitemap_url} yielded {} entries",
                entries.len()
            );
            for url in entries {
                state.links.record(url.as_str());
                frontier.enqueue(url, 1);
            }
        }
        Err(e) => warn!(target: "arachne::engine", "sitemap fetch failed: {e}"),
    }
}
