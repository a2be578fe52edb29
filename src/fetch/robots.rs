//! robots.txt compliance gate
//!
//! When enabled, each host's robots.txt is fetched once per run and cached.
//! A disallowed URL is silent filtering like any other policy rejection:
//! it stays in the link ledger and is never fetched.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, trace};
use lru::LruCache;
use robotstxt::DefaultMatcher;
use tokio::sync::Mutex;
use url::Url;

use crate::utils::constants::ROBOTS_CACHE_CAPACITY;

/// Per-host robots.txt cache and matcher
pub struct RobotsGate {
    client: reqwest::Client,
    user_agent: String,
    /// origin → robots body; empty body means allow-all
    cache: Mutex<LruCache<String, Arc<str>>>,
}

impl RobotsGate {
    #[must_use]
    pub fn new(client: reqwest::Client, user_agent: String) -> Self {
        let capacity = NonZeroUsize::new(ROBOTS_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            user_agent,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Whether the configured user agent may fetch `url`.
    ///
    /// An unreachable or unparseable robots.txt allows everything: absence
    /// of rules is not a prohibition.
    pub async fn allowed(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return true;
        };
        let origin = format!("{}://{}", url.scheme(), host);

        // held across the fetch so one miss per host fetches exactly once
        let mut cache = self.cache.lock().await;
        let body = match cache.get(&origin) {
            Some(body) => Arc::clone(body),
            None => {
                let body: Arc<str> = Arc::from(self.fetch_robots(url).await);
                cache.put(origin, Arc::clone(&body));
                body
            }
        };
        drop(cache);

        if body.is_empty() {
            return true;
        }
        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(&body, &self.user_agent, url.as_str());
        if !allowed {
            debug!(target: "arachne::robots", "disallowed by robots.txt: {url}");
        }
        allowed
    }

    async fn fetch_robots(&self, url: &Url) -> String {
        let Ok(robots_url) = url.join("/robots.txt") else {
            return String::new();
        };
        trace!(target: "arachne::robots", "fetching {robots_url}");
        match self.client.get(robots_url).send().await {
            Ok(response) if response.status().is_success() => {
                response.text().await.unwrap_or_default()
            }
            _ => String::new(),
        }
    }
}
