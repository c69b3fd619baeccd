//! Market ticker refresher
//!
//! Polls the markets ticker endpoint, formats each instrument and renders a
//! seamless-loop marquee row into a render target.

pub mod core;
pub mod engine;
pub mod infrastructure;
pub mod rest;
pub mod view;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use engine::{RefreshOutcome, RefreshSettings, Scheduler, TickerRefresher};
pub use infrastructure::config::{Config, DurationPolicy, TickerConfig};

use thiserror::Error;

/// Main error type for the ticker
#[derive(Error, Debug)]
pub enum TickerError {
    #[error("Configuration error: {0}")]
    Config(String),
}
