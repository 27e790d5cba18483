//! Market data provider interface and HTTP implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::indicators::Candle;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("rate limited by provider (429 too many requests)")]
    RateLimited,
    #[error("provider unavailable (status {0})")]
    Upstream(u16),
    #[error("provider rejected request (status {0})")]
    Status(u16),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Worth retrying later; must not be cached.
    pub fn is_transient(&self) -> bool {
        matches!(self, MarketDataError::RateLimited | MarketDataError::Upstream(_))
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Chronologically ordered candles, oldest first.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

/// Cacheable candle payload. Transient provider failures travel in `error`
/// so the caller still gets a well-formed body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleResponse {
    pub symbol: String,
    pub interval: String,
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandleResponse {
    pub fn ok(symbol: &str, interval: &str, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            candles,
            error: None,
        }
    }

    pub fn error(symbol: &str, interval: &str, error: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            candles: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Fetches `GET {base_url}/candles?symbol=..&interval=..&limit=..`, expecting a
/// JSON array of candles.
pub struct HttpCandleProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCandleProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl MarketDataProvider for HttpCandleProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/candles", self.base_url);
        let limit_param = limit.to_string();
        debug!(symbol = %symbol, interval = %interval, limit = limit, "Requesting candles");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if status.is_server_error() {
            return Err(MarketDataError::Upstream(status.as_u16()));
        }
        if !status.is_success() {
            return Err(MarketDataError::Status(status.as_u16()));
        }

        let mut candles: Vec<Candle> = response.json().await?;
        candles.sort_by_key(|c| c.time);
        Ok(candles)
    }
}
