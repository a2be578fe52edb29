//! Core configuration types for crawl sessions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::utils::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_REDIRECT_LIMIT, DEFAULT_REQUEST_TIMEOUT,
};

/// How redirects are followed during a fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectPolicy {
    /// Follow redirects to any origin, up to the hop limit
    #[default]
    Loose,
    /// Follow only same-origin redirects; a cross-origin hop ends the chain
    Strict,
}

/// Which operation a cron tick performs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CronType {
    /// Discover links and deliver events; pages are not retained
    #[default]
    Crawl,
    /// Additionally retain every visited page in the page ledger
    Scrape,
}

/// Options applied to a crawl session.
///
/// A plain value: apply any number of combinators, last write wins. It is
/// finalized into an immutable [`super::SessionConfig`] snapshot at
/// `build()` time (or implicitly when a run starts), which is when invalid
/// regexes, headers, proxies, budgets, and cron expressions are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Extra request headers sent with every fetch
    pub(crate) headers: HashMap<String, String>,
    /// User agent for requests; a crate default is used when unset
    pub(crate) user_agent: Option<String>,
    /// Honor robots.txt disallow rules
    pub(crate) respect_robots_txt: bool,
    /// Treat subdomains of the seed host as in scope
    pub(crate) subdomains: bool,
    /// Treat the seed name under other top-level domains as in scope
    pub(crate) tld: bool,
    /// Additional hosts treated as in scope
    pub(crate) external_domains: Vec<String>,
    /// Speak HTTP/2 without protocol upgrade negotiation
    pub(crate) http2_prior_knowledge: bool,
    /// Per-request timeout; `None` disables the bound
    pub(crate) request_timeout: Option<Duration>,
    /// Fetch caps per path pattern; empty means unlimited
    pub(crate) budget: HashMap<String, u32>,
    /// Maximum redirect hops per fetch
    pub(crate) redirect_limit: usize,
    pub(crate) redirect_policy: RedirectPolicy,
    /// Regex patterns whose matches are never fetched
    pub(crate) blacklist: Vec<String>,
    /// When non-empty, only matching URLs are fetched
    pub(crate) whitelist: Vec<String>,
    /// Minimum milliseconds between dispatched fetches
    pub(crate) delay_ms: u64,
    /// Link-depth limit from the seed; 0 means unlimited
    pub(crate) depth: usize,
    /// Serve fresh-enough prior responses instead of refetching
    pub(crate) caching: bool,
    /// Sitemap location used to seed the frontier, e.g. `/sitemap.xml`
    pub(crate) sitemap: Option<String>,
    /// Proxy URLs applied to the HTTP client
    pub(crate) proxies: Vec<String>,
    /// Launch the rendering browser with detection-evasion arguments
    pub(crate) stealth: bool,
    /// Intercept browser requests to block non-essential content
    pub(crate) chrome_intercept: bool,
    /// With interception, also block image loads
    pub(crate) block_images: bool,
    /// Accept invalid TLS certificates. Last resort only.
    pub(crate) accept_invalid_certs: bool,
    /// Keep undecoded body bytes on each page
    pub(crate) raw_content: bool,
    /// Six-field cron expression driving scheduled runs
    pub(crate) cron_expr: Option<String>,
    pub(crate) cron_type: CronType,
    /// Maximum concurrently executing fetch tasks
    pub(crate) concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            user_agent: None,
            respect_robots_txt: false,
            subdomains: false,
            tld: false,
            external_domains: Vec::new(),
            http2_prior_knowledge: false,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            budget: HashMap::new(),
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            redirect_policy: RedirectPolicy::Loose,
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            delay_ms: 0,
            depth: 0,
            caching: false,
            sitemap: None,
            proxies: Vec::new(),
            stealth: false,
            chrome_intercept: false,
            block_images: false,
            accept_invalid_certs: false,
            raw_content: false,
            cron_expr: None,
            cron_type: CronType::Crawl,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl CrawlConfig {
    /// Start from defaults; identical to `CrawlConfig::default()`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
