//! Accessor methods for `CrawlConfig`

use std::collections::HashMap;
use std::time::Duration;

use super::types::{CrawlConfig, CronType, RedirectPolicy};
use crate::utils::constants::DEFAULT_USER_AGENT;

impl CrawlConfig {
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Configured user agent, or the crate default
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    #[must_use]
    pub fn respect_robots_txt(&self) -> bool {
        self.respect_robots_txt
    }

    #[must_use]
    pub fn subdomains(&self) -> bool {
        self.subdomains
    }

    #[must_use]
    pub fn tld(&self) -> bool {
        self.tld
    }

    #[must_use]
    pub fn external_domains(&self) -> &[String] {
        &self.external_domains
    }

    #[must_use]
    pub fn http2_prior_knowledge(&self) -> bool {
        self.http2_prior_knowledge
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    #[must_use]
    pub fn budget(&self) -> &HashMap<String, u32> {
        &self.budget
    }

    #[must_use]
    pub fn redirect_limit(&self) -> usize {
        self.redirect_limit
    }

    #[must_use]
    pub fn redirect_policy(&self) -> RedirectPolicy {
        self.redirect_policy
    }

    #[must_use]
    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    #[must_use]
    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn caching(&self) -> bool {
        self.caching
    }

    #[must_use]
    pub fn sitemap(&self) -> Option<&str> {
        self.sitemap.as_deref()
    }

    #[must_use]
    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    #[must_use]
    pub fn stealth(&self) -> bool {
        self.stealth
    }

    #[must_use]
    pub fn chrome_intercept(&self) -> bool {
        self.chrome_intercept
    }

    #[must_use]
    pub fn block_images(&self) -> bool {
        self.block_images
    }

    #[must_use]
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    #[must_use]
    pub fn raw_content(&self) -> bool {
        self.raw_content
    }

    #[must_use]
    pub fn cron_expr(&self) -> Option<&str> {
        self.cron_expr.as_deref()
    }

    #[must_use]
    pub fn cron_type(&self) -> CronType {
        self.cron_type
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
