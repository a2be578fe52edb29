//! Rendering transport
//!
//! Fetches a page through a headless browser so script-driven markup is
//! materialized before extraction. The browser is launched lazily on the
//! first render and shared for the rest of the session. The `Renderer`
//! trait is the seam tests use to substitute a stub.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chrono::Utc;
use futures::future::BoxFuture;
use futures_util::StreamExt;
use log::{debug, error, info};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use url::Url;

use crate::config::SessionConfig;
use crate::errors::{CrawlError, CrawlResult, FetchErrorKind};
use crate::page::Page;
use crate::utils::constants::RENDER_NAVIGATION_TIMEOUT_SECS;

/// A transport that produces fully rendered page content
pub trait Renderer: Send + Sync {
    /// Render one URL to a [`Page`]
    fn render<'a>(&'a self, url: Url) -> BoxFuture<'a, CrawlResult<Page>>;
}

/// Chromium-backed renderer, launched lazily per session
pub struct ChromeRenderer {
    stealth: bool,
    chrome_intercept: bool,
    block_images: bool,
    raw_content: bool,
    navigation_timeout_secs: u64,
    browser: OnceCell<(Browser, JoinHandle<()>)>,
}

impl ChromeRenderer {
    #[must_use]
    pub fn new(snapshot: &SessionConfig) -> Self {
        let config = snapshot.config();
        Self {
            stealth: config.stealth(),
            chrome_intercept: config.chrome_intercept(),
            block_images: config.block_images(),
            raw_content: config.raw_content(),
            navigation_timeout_secs: config
                .request_timeout()
                .map_or(RENDER_NAVIGATION_TIMEOUT_SECS, |t| t.as_secs().max(1)),
            browser: OnceCell::new(),
        }
    }

    async fn browser(&self) -> CrawlResult<&Browser> {
        let (browser, _handler) = self
            .browser
            .get_or_try_init(|| self.launch())
            .await?;
        Ok(browser)
    }

    async fn launch(&self) -> CrawlResult<(Browser, JoinHandle<()>)> {
        let mut builder = BrowserConfigBuilder::default()
            .headless_mode(HeadlessMode::default())
            .request_timeout(Duration::from_secs(self.navigation_timeout_secs))
            .window_size(1920, 1080)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-notifications")
            .arg("--mute-audio");

        if self.stealth {
            builder = builder
                .arg("--disable-blink-features=AutomationControlled")
                .arg("--disable-infobars")
                .arg("--disable-extensions")
                .arg("--disable-background-networking")
                .arg("--metrics-recording-only")
                .arg("--password-store=basic")
                .arg("--hide-scrollbars");
        }
        if self.chrome_intercept {
            builder = builder.arg("--disable-background-timer-throttling");
            if self.block_images {
                builder = builder.arg("--blink-settings=imagesEnabled=false");
            }
        }

        let config = builder
            .build()
            .map_err(|e| CrawlError::Configuration(format!("failed to build browser config: {e}")))?;

        info!(target: "arachne::render", "launching browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| render_error("about:blank", &e))?;

        // drive the CDP connection for the lifetime of the browser
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    error!(target: "arachne::render", "browser handler error: {e}");
                }
            }
            debug!(target: "arachne::render", "browser handler finished");
        });

        Ok((browser, handler_task))
    }
}

impl Renderer for ChromeRenderer {
    fn render<'a>(&'a self, url: Url) -> BoxFuture<'a, CrawlResult<Page>> {
        Box::pin(async move {
            let browser = self.browser().await?;
            let timeout = self.navigation_timeout_secs;

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| render_error(url.as_str(), &e))?;

            let navigation = async {
                page.goto(url.as_str())
                    .await
                    .map_err(|e| render_error(url.as_str(), &e))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| render_error(url.as_str(), &e))?;
                page.content()
                    .await
                    .map_err(|e| render_error(url.as_str(), &e))
            };
            let content = match with_navigation_timeout(navigation, timeout).await {
                Ok(content) => content,
                Err(e) => {
                    return Err(e.unwrap_or_else(|| {
                        CrawlError::fetch(url.as_str(), FetchErrorKind::Timeout)
                    }));
                }
            };

            Ok(Page {
                url: url.to_string(),
                raw_content: self.raw_content.then(|| content.clone().into_bytes()),
                content,
                // navigation succeeded; the CDP layer does not surface the status
                status_code: 200,
                headers: None,
                fetched_at: Utc::now(),
            })
        })
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        if let Some((_browser, handler)) = self.browser.get() {
            handler.abort();
        }
    }
}

/// Bound a navigation future; `Err(None)` signals the timeout fired.
async fn with_navigation_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
) -> Result<T, Option<CrawlError>>
where
    F: Future<Output = CrawlResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result.map_err(Some),
        Err(_elapsed) => Err(None),
    }
}

fn render_error(url: &str, err: &impl std::fmt::Display) -> CrawlError {
    CrawlError::fetch(url, FetchErrorKind::Render(err.to_string()))
}
