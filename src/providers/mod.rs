// src/providers/mod.rs
use async_trait::async_trait;

use crate::types::{OpenInterestSeries, PriceSeries, Timeframe};

pub mod binance;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("exchange error {code}: {msg}")]
    Exchange { code: i64, msg: String },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Candles for `symbol` at `tf`, oldest first.
    async fn price_series(&self, symbol: &str, tf: Timeframe, limit: usize) -> Result<PriceSeries, FetchError>;
}

#[async_trait]
pub trait FundingProvider: Send + Sync {
    async fn current_funding(&self, symbol: &str) -> Result<f64, FetchError>;
    /// Past funding rates, most recent last.
    async fn funding_history(&self, symbol: &str, limit: usize) -> Result<Vec<f64>, FetchError>;
}

#[async_trait]
pub trait OpenInterestProvider: Send + Sync {
    async fn oi_series(&self, symbol: &str, period: &str, limit: usize) -> Result<OpenInterestSeries, FetchError>;
}
