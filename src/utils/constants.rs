//! Shared configuration constants
//!
//! Default values used throughout the engine to keep behavior consistent
//! and avoid magic numbers at call sites.

use std::time::Duration;

/// Default user agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("arachne/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout: 15 seconds
///
/// Bounds every HTTP round trip and every rendering navigation step.
/// Long enough for slow origin servers, short enough that a stalled
/// host cannot wedge a worker for the whole run.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default redirect hop limit
///
/// Seven hops covers every legitimate redirect chain observed in
/// practice (http→https, apex→www, trailing-slash, login bounces)
/// while cutting off redirect loops quickly.
pub const DEFAULT_REDIRECT_LIMIT: usize = 7;

/// Default number of concurrently executing fetch tasks
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Freshness window for the optional HTTP response cache
///
/// A cached response younger than this is served instead of a new
/// round trip when caching is enabled. Sized for recurring cron runs
/// against slowly changing sites.
pub const CACHE_FRESHNESS: Duration = Duration::from_secs(60);

/// Maximum number of canonical URLs retained in the response cache
pub const CACHE_CAPACITY: usize = 512;

/// Maximum number of hosts whose robots.txt bodies are retained
pub const ROBOTS_CACHE_CAPACITY: usize = 128;

/// Timeout for rendering navigation (goto + load), in seconds
pub const RENDER_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Interval at which `CronHandle::stop` polls for run completion
pub const CRON_DRAIN_POLL: Duration = Duration::from_millis(50);
