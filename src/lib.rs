//! arachne: a configurable web-crawling and scraping engine
//!
//! Given a seed URL, a [`Website`] session discovers and fetches reachable
//! pages, extracts outbound links, enforces politeness/scope/budget
//! policies, and delivers results either as a one-shot collection or as a
//! stream of events to subscribers, optionally on a recurring schedule.
//!
//! ```rust,no_run
//! use arachne::{CrawlConfig, Website};
//!
//! # async fn example() -> arachne::CrawlResult<()> {
//! let site = Website::new("https://example.com").with_config(
//!     CrawlConfig::default()
//!         .with_depth(2)
//!         .with_delay(250)
//!         .with_subdomains(true),
//! );
//! site.subscribe(|event| {
//!     if let Ok(event) = event {
//!         println!("fetched {}", event.page.url);
//!     }
//! });
//! site.crawl(false, false).await?;
//! println!("{} pages visited", site.size());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod page;
pub mod policy;
pub mod schedule;
pub mod session;
pub mod store;
pub mod utils;

pub use config::{CrawlConfig, CronType, RedirectPolicy, SessionConfig};
pub use errors::{CrawlError, CrawlResult, FetchErrorKind};
pub use events::{EventBus, PageEvent};
pub use fetch::{FetchMode, Renderer};
pub use page::Page;
pub use schedule::CronHandle;
pub use session::{CrawlStatus, Website};
pub use store::export::read_jsonl;

/// Everything a one-shot crawl produced: the link ledger and the retained
/// pages.
#[derive(Debug, Clone, Default)]
pub struct CrawlCapture {
    pub links: Vec<String>,
    pub pages: Vec<Page>,
}

/// Crawl a website over plain HTTP, gathering all links and html.
///
/// Convenience wrapper over a default-configured [`Website`] scrape.
///
/// # Errors
///
/// Returns [`CrawlError::Configuration`] for an invalid seed URL.
pub async fn crawl(url: &str) -> CrawlResult<CrawlCapture> {
    let site = Website::new(url);
    site.scrape(false, false).await?;
    Ok(CrawlCapture {
        links: site.links(),
        pages: site.pages(),
    })
}
