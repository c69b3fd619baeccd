//! Ticker data sources
//!
//! `TickerSource` is the fetch seam used by the refresher. The production
//! implementation talks to the markets endpoint over HTTP.

pub mod client;

pub use client::{HttpTickerSource, TICKER_PATH};

use crate::core::TickerPayload;

/// Something that can produce a fresh ticker payload
///
/// # Design Notes
/// - Generic at the call site, no dynamic dispatch
/// - One call per refresh cycle; implementations hold no per-cycle state
#[allow(async_fn_in_trait)]
pub trait TickerSource {
    /// Fetch and parse one payload
    async fn fetch(&self) -> Result<TickerPayload, FetchError>;
}

/// Fetch-or-parse failures
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}
