//! Fetch dispatch: transports, caching, robots compliance, mode selection
//!
//! The engine drains the frontier into a bounded pool of fetch tasks; each
//! task goes through one of the transports here. `Http` uses the plain
//! client, `Chrome` uses the rendering browser, and `Smart` tries HTTP
//! first and escalates to rendering exactly once when the result fails the
//! render-need heuristic.

pub mod cache;
pub mod client;
pub mod http;
pub mod mode;
pub mod render;
pub mod robots;

use serde::{Deserialize, Serialize};

pub use cache::ResponseCache;
pub use client::build_http_client;
pub use http::HttpFetcher;
pub use mode::needs_render;
pub use render::{ChromeRenderer, Renderer};
pub use robots::RobotsGate;

/// Transport strategy for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchMode {
    /// Plain HTTP fetches only
    #[default]
    Http,
    /// Rendering (headless browser) fetches only
    Chrome,
    /// HTTP first, escalating to rendering per URL when needed
    Smart,
}
