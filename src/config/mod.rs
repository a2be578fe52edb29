//! Configuration for crawl sessions
//!
//! `CrawlConfig` is an immutable options value assembled with consuming
//! `with_*` combinators; nothing is validated until it is finalized into a
//! [`SessionConfig`] snapshot, which compiles patterns and checks every
//! option exactly once before a run starts.

// Sub-modules
pub mod getters;
pub mod methods;
pub mod session;
pub mod types;

// Re-exports for public API
pub use session::SessionConfig;
pub use types::{CrawlConfig, CronType, RedirectPolicy};
