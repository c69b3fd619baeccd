//! Infrastructure
//!
//! Non-formatting concerns around the refresher:
//! - Configuration management
//! - Logging
//! - Refresh metrics

pub mod config;
pub mod logging;
pub mod metrics;

pub use metrics::{MetricsSnapshot, RefreshMetrics};
