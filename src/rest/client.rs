//! HTTP ticker source
//!
//! API: GET {base_url}/api/markets/ticker/
//! Header `Accept: application/json`, no query, no body.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use super::{FetchError, TickerSource};
use crate::core::TickerPayload;
use crate::infrastructure::config::TickerConfig;
use crate::{log_fetch, TickerError};

/// Fixed endpoint path, joined onto the configured base URL
pub const TICKER_PATH: &str = "/api/markets/ticker/";

/// reqwest-backed ticker source
#[derive(Debug, Clone)]
pub struct HttpTickerSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpTickerSource {
    /// Create source for `base_url` with request timeout and user agent
    ///
    /// # Errors
    /// Returns `TickerError::Config` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, TickerError> {
        let url = ticker_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self { client, url })
    }

    /// Create from the `[ticker]` config section
    pub fn from_config(config: &TickerConfig) -> Result<Self, TickerError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    /// Full endpoint URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl TickerSource for HttpTickerSource {
    async fn fetch(&self) -> Result<TickerPayload, FetchError> {
        log_fetch!(tracing::Level::DEBUG, "GET {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let payload: TickerPayload = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        log_fetch!(
            tracing::Level::DEBUG,
            "Received {} ticker items (as_of: {:?})",
            payload.items.len(),
            payload.as_of
        );

        Ok(payload)
    }
}

/// Join the endpoint path onto `base_url`
fn ticker_url(base_url: &str) -> Result<Url, TickerError> {
    let base = Url::parse(base_url.trim())
        .map_err(|e| TickerError::Config(format!("Invalid base_url {:?}: {}", base_url, e)))?;
    if base.cannot_be_a_base() {
        return Err(TickerError::Config(format!("base_url {:?} cannot be a base", base_url)));
    }
    base.join(TICKER_PATH)
        .map_err(|e| TickerError::Config(format!("Invalid ticker URL: {}", e)))
}
