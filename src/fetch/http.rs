//! Plain HTTP transport
//!
//! One fetch = the manual redirect walk for a single canonical URL,
//! producing a [`Page`] on a successful terminal response. Timeouts,
//! connection failures, redirect-limit overruns, and non-success statuses
//! are classified into [`FetchErrorKind`] so the engine can recover
//! per URL.

use chrono::Utc;
use log::{debug, trace};
use parking_lot::Mutex;
use reqwest::header::LOCATION;
use url::Url;

use super::cache::ResponseCache;
use crate::config::{RedirectPolicy, SessionConfig};
use crate::errors::{CrawlError, CrawlResult, FetchErrorKind};
use crate::page::{header_map_to_hash_map, Page};
use crate::utils::canonicalize_in;

/// HTTP fetcher bound to one session's transport policy
pub struct HttpFetcher {
    client: reqwest::Client,
    redirect_limit: usize,
    redirect_policy: RedirectPolicy,
    raw_content: bool,
    cache: Option<Mutex<ResponseCache>>,
}

impl HttpFetcher {
    /// Build the fetcher and its client from a session snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] when the client cannot be
    /// constructed from the configured transport options.
    pub fn new(snapshot: &SessionConfig) -> CrawlResult<Self> {
        let client = super::build_http_client(snapshot)?;
        let config = snapshot.config();
        Ok(Self {
            client,
            redirect_limit: config.redirect_limit(),
            redirect_policy: config.redirect_policy(),
            raw_content: config.raw_content(),
            cache: config.caching().then(|| Mutex::new(ResponseCache::default())),
        })
    }

    /// The underlying client, shared with collaborators like the robots
    /// gate so the whole session speaks with one transport identity.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch one canonical URL, following redirects per session policy.
    pub async fn fetch(&self, url: &Url) -> CrawlResult<Page> {
        if let Some(cache) = &self.cache
            && let Some(page) = cache.lock().get(url.as_str())
        {
            trace!(target: "arachne::fetch", "cache hit: {url}");
            return Ok(page);
        }

        let response = self.follow(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::fetch(
                url.as_str(),
                FetchErrorKind::Status(status.as_u16()),
            ));
        }

        let final_url = response.url().to_string();
        let headers = header_map_to_hash_map(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CrawlError::from_reqwest(url.as_str(), &e))?;

        let page = Page {
            url: final_url,
            content: String::from_utf8_lossy(&bytes).into_owned(),
            status_code: status.as_u16(),
            raw_content: self.raw_content.then(|| bytes.to_vec()),
            headers: Some(headers),
            fetched_at: Utc::now(),
        };

        if let Some(cache) = &self.cache {
            cache.lock().put(url.as_str().to_string(), page.clone());
        }
        Ok(page)
    }

    /// Walk redirects up to the hop limit and return the terminal response.
    async fn follow(&self, origin: &Url) -> CrawlResult<reqwest::Response> {
        let mut current = origin.clone();
        let mut hops = 0usize;

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| CrawlError::from_reqwest(origin.as_str(), &e))?;

            if !response.status().is_redirection() {
                return Ok(response);
            }

            let Some(next) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|loc| canonicalize_in(&current, loc))
            else {
                // redirect without a usable target is terminal
                return Ok(response);
            };

            hops += 1;
            if hops > self.redirect_limit {
                return Err(CrawlError::fetch(
                    origin.as_str(),
                    FetchErrorKind::RedirectLimit(hops),
                ));
            }

            if self.redirect_policy == RedirectPolicy::Strict && !same_origin(&next, origin) {
                debug!(
                    target: "arachne::fetch",
                    "cross-origin redirect not followed under strict policy: {current} -> {next}"
                );
                return Ok(response);
            }

            trace!(target: "arachne::fetch", "redirect {current} -> {next}");
            current = next;
        }
    }
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    fn fetcher(config: CrawlConfig) -> HttpFetcher {
        let snapshot = SessionConfig::build("https://example.com", &config).unwrap();
        HttpFetcher::new(&snapshot).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn same_origin_compares_scheme_host_port() {
        assert!(same_origin(
            &url("https://example.com/a"),
            &url("https://example.com:443/b")
        ));
        assert!(!same_origin(
            &url("http://example.com/a"),
            &url("https://example.com/a")
        ));
        assert!(!same_origin(
            &url("https://example.com/a"),
            &url("https://other.com/a")
        ));
    }

    #[tokio::test]
    async fn follows_redirect_chain() {
        let mut server = mockito::Server::new_async().await;
        let target = server
            .mock("GET", "/final")
            .with_status(200)
            .with_body("<html>done</html>")
            .create_async()
            .await;
        server
            .mock("GET", "/start")
            .with_status(302)
            .with_header("location", "/final")
            .create_async()
            .await;

        let f = fetcher(CrawlConfig::default());
        let page = f
            .fetch(&url(&format!("{}/start", server.url())))
            .await
            .unwrap();
        assert_eq!(page.status_code, 200);
        assert!(page.url.ends_with("/final"));
        target.assert_async().await;
    }

    #[tokio::test]
    async fn redirect_limit_is_enforced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect_at_least(1)
            .create_async()
            .await;

        let f = fetcher(CrawlConfig::default().with_redirect_limit(2));
        let err = f
            .fetch(&url(&format!("{}/loop", server.url())))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Fetch {
                kind: FetchErrorKind::RedirectLimit(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let f = fetcher(CrawlConfig::default());
        let err = f
            .fetch(&url(&format!("{}/missing", server.url())))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Fetch {
                kind: FetchErrorKind::Status(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn caching_serves_second_fetch_without_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/once")
            .with_status(200)
            .with_body("cached body")
            .expect(1)
            .create_async()
            .await;

        let f = fetcher(CrawlConfig::default().with_caching(true));
        let target = url(&format!("{}/once", server.url()));
        let first = f.fetch(&target).await.unwrap();
        let second = f.fetch(&target).await.unwrap();
        assert_eq!(first.content, second.content);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn raw_content_keeps_bytes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/raw")
            .with_status(200)
            .with_body("bytes")
            .create_async()
            .await;

        let f = fetcher(CrawlConfig::default().with_raw_content(true));
        let page = f.fetch(&url(&format!("{}/raw", server.url()))).await.unwrap();
        assert_eq!(page.raw_content.as_deref(), Some(b"bytes".as_ref()));
    }
}
