//! Immutable session snapshot
//!
//! `SessionConfig` is the validated form of a `CrawlConfig` bound to a seed
//! URL. All pattern compilation and option checking happens exactly once
//! here, so the hot admission and fetch paths never parse anything.

use std::str::FromStr;

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::types::CrawlConfig;
use crate::errors::{CrawlError, CrawlResult};
use crate::utils::canonicalize;

/// Validated, immutable configuration for one or more runs of a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub(crate) seed: Url,
    pub(crate) config: CrawlConfig,
    pub(crate) blacklist: Vec<Regex>,
    pub(crate) whitelist: Vec<Regex>,
    pub(crate) headers: HeaderMap,
    pub(crate) proxies: Vec<reqwest::Proxy>,
}

impl SessionConfig {
    /// Validate `config` against the seed URL and snapshot it.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] for an unparseable seed,
    /// invalid blacklist/whitelist regex, malformed header name or value,
    /// unusable proxy URL, empty budget pattern, or invalid cron
    /// expression.
    pub fn build(seed: &str, config: &CrawlConfig) -> CrawlResult<Self> {
        let seed = canonicalize(seed)
            .ok_or_else(|| CrawlError::Configuration(format!("invalid seed url: {seed}")))?;
        if seed.host_str().is_none() {
            return Err(CrawlError::Configuration(format!(
                "seed url has no host: {seed}"
            )));
        }

        let blacklist = compile_patterns(&config.blacklist, "blacklist")?;
        let whitelist = compile_patterns(&config.whitelist, "whitelist")?;
        let headers = build_header_map(config)?;
        let proxies = build_proxies(config)?;

        for pattern in config.budget.keys() {
            if pattern.is_empty() {
                return Err(CrawlError::Configuration(
                    "budget pattern must not be empty".into(),
                ));
            }
        }

        if let Some(expr) = config.cron_expr.as_deref() {
            validate_cron_expr(expr)?;
        }

        Ok(Self {
            seed,
            config: config.clone(),
            blacklist,
            whitelist,
            headers,
            proxies,
        })
    }

    /// The canonical seed URL
    #[must_use]
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The raw options this snapshot was built from
    #[must_use]
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Compiled blacklist patterns
    #[must_use]
    pub fn blacklist(&self) -> &[Regex] {
        &self.blacklist
    }

    /// Compiled whitelist patterns
    #[must_use]
    pub fn whitelist(&self) -> &[Regex] {
        &self.whitelist
    }
}

fn compile_patterns(patterns: &[String], what: &str) -> CrawlResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| CrawlError::Configuration(format!("invalid {what} pattern '{p}': {e}")))
        })
        .collect()
}

fn build_header_map(config: &CrawlConfig) -> CrawlResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(config.headers.len());
    for (key, value) in &config.headers {
        let name = HeaderName::from_str(key)
            .map_err(|e| CrawlError::Configuration(format!("invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CrawlError::Configuration(format!("invalid header value for '{key}': {e}")))?;
        headers.append(name, value);
    }
    Ok(headers)
}

fn build_proxies(config: &CrawlConfig) -> CrawlResult<Vec<reqwest::Proxy>> {
    config
        .proxies
        .iter()
        .map(|p| {
            reqwest::Proxy::all(p)
                .map_err(|e| CrawlError::Configuration(format!("invalid proxy '{p}': {e}")))
        })
        .collect()
}

/// Probe the scheduler's parser so a bad expression surfaces at `build()`
/// instead of at the first tick.
fn validate_cron_expr(expr: &str) -> CrawlResult<()> {
    tokio_cron_scheduler::Job::new_async(expr, |_id, _sched| Box::pin(async {}))
        .map(|_| ())
        .map_err(|e| CrawlError::Configuration(format!("invalid cron expression '{expr}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn builds_from_defaults() {
        let snapshot = SessionConfig::build("https://example.com", &CrawlConfig::default());
        assert!(snapshot.is_ok());
    }

    #[test]
    fn rejects_invalid_seed() {
        let err = SessionConfig::build("not a url", &CrawlConfig::default());
        assert!(matches!(err, Err(CrawlError::Configuration(_))));
    }

    #[test]
    fn rejects_invalid_blacklist_regex() {
        let config = CrawlConfig::default().with_blacklist_url(Some(vec!["[".into()]));
        let err = SessionConfig::build("https://example.com", &config);
        assert!(matches!(err, Err(CrawlError::Configuration(_))));
    }

    #[test]
    fn rejects_invalid_header_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".into(), "value".into());
        let config = CrawlConfig::default().with_headers(Some(headers));
        let err = SessionConfig::build("https://example.com", &config);
        assert!(matches!(err, Err(CrawlError::Configuration(_))));
    }

    #[test]
    fn rejects_empty_budget_pattern() {
        let mut budget = HashMap::new();
        budget.insert(String::new(), 5);
        let config = CrawlConfig::default().with_budget(Some(budget));
        let err = SessionConfig::build("https://example.com", &config);
        assert!(matches!(err, Err(CrawlError::Configuration(_))));
    }

    #[test]
    fn rejects_invalid_cron_expression() {
        let config = CrawlConfig::default().with_cron("not a cron", super::super::CronType::Crawl);
        let err = SessionConfig::build("https://example.com", &config);
        assert!(matches!(err, Err(CrawlError::Configuration(_))));
    }

    #[test]
    fn seed_is_canonicalized() {
        let snapshot =
            SessionConfig::build("https://Example.com/start#frag", &CrawlConfig::default())
                .unwrap();
        assert_eq!(snapshot.seed().as_str(), "https://example.com/start");
    }
}
