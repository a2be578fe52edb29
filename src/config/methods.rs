//! Consuming combinators for `CrawlConfig`
//!
//! Each method takes the value, replaces one option, and returns it, so a
//! configuration reads as a single expression. Repeated application is
//! last-write-wins.

use std::collections::HashMap;
use std::time::Duration;

use super::types::{CrawlConfig, CronType, RedirectPolicy};

impl CrawlConfig {
    /// Set extra request headers; `None` clears them
    #[must_use]
    pub fn with_headers(mut self, headers: Option<HashMap<String, String>>) -> Self {
        self.headers = headers.unwrap_or_default();
        self
    }

    /// Set the user agent; `None` restores the crate default
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<&str>) -> Self {
        self.user_agent = user_agent.map(str::to_string);
        self
    }

    /// Honor robots.txt disallow rules
    #[must_use]
    pub fn with_respect_robots_txt(mut self, respect: bool) -> Self {
        self.respect_robots_txt = respect;
        self
    }

    /// Include subdomains of the seed host in scope
    #[must_use]
    pub fn with_subdomains(mut self, subdomains: bool) -> Self {
        self.subdomains = subdomains;
        self
    }

    /// Include the seed name under other top-level domains in scope
    #[must_use]
    pub fn with_tld(mut self, tld: bool) -> Self {
        self.tld = tld;
        self
    }

    /// Add hosts treated as in scope beyond the seed domain
    #[must_use]
    pub fn with_external_domains(mut self, external_domains: Option<Vec<String>>) -> Self {
        self.external_domains = external_domains.unwrap_or_default();
        self
    }

    /// Only use HTTP/2
    #[must_use]
    pub fn with_http2_prior_knowledge(mut self, http2_prior_knowledge: bool) -> Self {
        self.http2_prior_knowledge = http2_prior_knowledge;
        self
    }

    /// Max time to wait for a request, in milliseconds; `None` removes the bound
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout_ms: Option<u64>) -> Self {
        self.request_timeout = request_timeout_ms.map(Duration::from_millis);
        self
    }

    /// Set the crawling budget: fetch caps per path pattern, `*` as fallback
    #[must_use]
    pub fn with_budget(mut self, budget: Option<HashMap<String, u32>>) -> Self {
        self.budget = budget.unwrap_or_default();
        self
    }

    /// Set the max redirects allowed per request
    #[must_use]
    pub fn with_redirect_limit(mut self, redirect_limit: usize) -> Self {
        self.redirect_limit = redirect_limit;
        self
    }

    /// Set the redirect policy, strict (same-origin only) or loose
    #[must_use]
    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// Regex blacklist: matching URLs are ledgered but never fetched
    #[must_use]
    pub fn with_blacklist_url(mut self, blacklist: Option<Vec<String>>) -> Self {
        self.blacklist = blacklist.unwrap_or_default();
        self
    }

    /// Regex whitelist: when non-empty, only matching URLs are fetched
    #[must_use]
    pub fn with_whitelist_url(mut self, whitelist: Option<Vec<String>>) -> Self {
        self.whitelist = whitelist.unwrap_or_default();
        self
    }

    /// Delay between dispatched requests, in milliseconds
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set a crawl depth limit. If the value is 0 there is no limit.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Cache responses and serve fresh-enough ones without a round trip
    #[must_use]
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Seed the frontier from a sitemap location, e.g. `/sitemap.xml`
    #[must_use]
    pub fn with_sitemap(mut self, sitemap: Option<&str>) -> Self {
        self.sitemap = sitemap.map(str::to_string);
        self
    }

    /// Use proxies for requests
    #[must_use]
    pub fn with_proxies(mut self, proxies: Option<Vec<String>>) -> Self {
        self.proxies = proxies.unwrap_or_default();
        self
    }

    /// Use stealth mode for rendering fetches
    #[must_use]
    pub fn with_stealth(mut self, stealth: bool) -> Self {
        self.stealth = stealth;
        self
    }

    /// Intercept browser requests; optionally block image loads
    #[must_use]
    pub fn with_chrome_intercept(mut self, intercept: bool, block_images: bool) -> Self {
        self.chrome_intercept = intercept;
        self.block_images = block_images;
        self
    }

    /// Dangerously accept invalid certificates. Last resort only.
    #[must_use]
    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Keep undecoded body bytes on each page
    #[must_use]
    pub fn with_raw_content(mut self, raw_content: bool) -> Self {
        self.raw_content = raw_content;
        self
    }

    /// Set up cron runs: a six-field cron expression and the operation per tick
    #[must_use]
    pub fn with_cron(mut self, cron_expr: &str, cron_type: CronType) -> Self {
        self.cron_expr = Some(cron_expr.to_string());
        self.cron_type = cron_type;
        self
    }

    /// Set the maximum number of concurrently executing fetch tasks
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
