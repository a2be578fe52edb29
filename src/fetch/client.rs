//! HTTP client construction from a session snapshot

use reqwest::redirect::Policy;

use crate::config::SessionConfig;
use crate::errors::{CrawlError, CrawlResult};

/// Build the session's HTTP client.
///
/// Redirects are disabled at the client level; the fetcher walks them
/// manually so the hop limit and the strict same-origin policy can be
/// enforced per session.
pub fn build_http_client(snapshot: &SessionConfig) -> CrawlResult<reqwest::Client> {
    let config = snapshot.config();

    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent())
        .default_headers(snapshot.headers.clone())
        .redirect(Policy::none())
        .gzip(true);

    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    if config.http2_prior_knowledge() {
        builder = builder.http2_prior_knowledge();
    }
    if config.accept_invalid_certs() {
        builder = builder.danger_accept_invalid_certs(true);
    }
    for proxy in &snapshot.proxies {
        builder = builder.proxy(proxy.clone());
    }

    builder
        .build()
        .map_err(|e| CrawlError::Configuration(format!("failed to build http client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    #[test]
    fn builds_with_defaults() {
        let snapshot = SessionConfig::build("https://example.com", &CrawlConfig::default()).unwrap();
        assert!(build_http_client(&snapshot).is_ok());
    }

    #[test]
    fn builds_with_full_transport_options() {
        let config = CrawlConfig::default()
            .with_user_agent(Some("test-agent/1.0"))
            .with_request_timeout(Some(5_000))
            .with_http2_prior_knowledge(true)
            .with_proxies(Some(vec!["http://127.0.0.1:8080".into()]));
        let snapshot = SessionConfig::build("https://example.com", &config).unwrap();
        assert!(build_http_client(&snapshot).is_ok());
    }
}
