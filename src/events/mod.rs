//! In-process publish/subscribe of per-page events

pub mod bus;
pub mod metrics;
pub mod types;

pub use bus::EventBus;
pub use metrics::{EventBusMetrics, MetricsSnapshot};
pub use types::{PageCallback, PageEvent};
