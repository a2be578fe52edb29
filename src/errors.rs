//! Error types for crawl operations.
//!
//! Scope, budget, and robots rejections are intentionally absent here:
//! they are silent filtering, observable only through the link ledger.

use std::fmt;

/// Top-level error type for session and engine operations
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Invalid option detected when it was applied or at `build()`
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A fetch failed for one URL; recoverable except for the seed
    #[error("fetch failed for {url}: {kind}")]
    Fetch { url: String, kind: FetchErrorKind },

    /// Cron registration or shutdown failed
    #[error("schedule error: {0}")]
    Schedule(String),

    /// Export or other filesystem I/O failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation cancelled via `stop()`
    #[error("crawl operation was cancelled")]
    Cancelled,
}

/// Classification of per-URL fetch failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Request exceeded the configured timeout
    Timeout,
    /// Connection-level failure (DNS, refused, reset, TLS)
    Transport(String),
    /// Redirect chain exceeded the configured limit
    RedirectLimit(usize),
    /// Server answered with a non-success status
    Status(u16),
    /// Rendering fetch failed
    Render(String),
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::RedirectLimit(hops) => write!(f, "redirect limit exceeded after {hops} hops"),
            Self::Status(code) => write!(f, "non-success status {code}"),
            Self::Render(msg) => write!(f, "render error: {msg}"),
        }
    }
}

impl CrawlError {
    /// Build a fetch error for a URL
    pub(crate) fn fetch(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self::Fetch {
            url: url.into(),
            kind,
        }
    }

    /// Classify a `reqwest` failure into the fetch taxonomy
    pub(crate) fn from_reqwest(url: impl Into<String>, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_connect() {
            FetchErrorKind::Transport(format!("connection failed: {err}"))
        } else {
            FetchErrorKind::Transport(err.to_string())
        };
        Self::fetch(url, kind)
    }
}

/// Convenience alias for Result with [`CrawlError`]
pub type CrawlResult<T> = Result<T, CrawlError>;
