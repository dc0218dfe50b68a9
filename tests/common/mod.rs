#![allow(dead_code)]

use async_trait::async_trait;
use fng_index::gate::{AccessDecision, AccessDenial, AccessGate, AccessRequest, GateError};
use fng_index::providers::{FetchError, FundingProvider, OpenInterestProvider, PriceProvider};
use fng_index::types::{Candle, OpenInterestPoint, OpenInterestSeries, PriceSeries, Timeframe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const DAY_MS: i64 = 86_400_000;

pub fn candles(closes: &[f64], volumes: &[f64]) -> PriceSeries {
    let candles = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| Candle {
            open_time_ms: i as i64 * DAY_MS,
            open: c,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
            volume: v,
            close_time_ms: (i as i64 + 1) * DAY_MS - 1,
            quote_volume: c * v,
        })
        .collect();
    PriceSeries::new(candles).unwrap()
}

/// Seeded geometric random walk with noisy volume.
pub fn random_walk(seed: u64, n: usize) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut px = 100.0;
    let mut closes = Vec::with_capacity(n);
    let mut vols = Vec::with_capacity(n);
    for _ in 0..n {
        px *= (rng.random_range(-0.04..0.04f64)).exp();
        closes.push(px);
        vols.push(rng.random_range(500.0..5_000.0f64));
    }
    candles(&closes, &vols)
}

pub fn oi_series(values: &[f64]) -> OpenInterestSeries {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| OpenInterestPoint {
            ts_ms: i as i64 * DAY_MS,
            sum_open_interest: v,
            sum_open_interest_value: v * 150.0,
        })
        .collect();
    OpenInterestSeries::new(points).unwrap()
}

pub struct StubPrices {
    pub series: PriceSeries,
    pub calls: Arc<AtomicUsize>,
}

impl StubPrices {
    pub fn new(series: PriceSeries) -> Self { Self { series, calls: Arc::new(AtomicUsize::new(0)) } }
}

#[async_trait]
impl PriceProvider for StubPrices {
    async fn price_series(&self, _symbol: &str, _tf: Timeframe, _limit: usize) -> Result<PriceSeries, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.series.clone())
    }
}

pub struct FailingPrices;

#[async_trait]
impl PriceProvider for FailingPrices {
    async fn price_series(&self, _symbol: &str, _tf: Timeframe, _limit: usize) -> Result<PriceSeries, FetchError> {
        Err(FetchError::Status { status: 503, body: "down".into() })
    }
}

pub struct StubFunding {
    pub current: f64,
    pub history: Vec<f64>,
}

#[async_trait]
impl FundingProvider for StubFunding {
    async fn current_funding(&self, _symbol: &str) -> Result<f64, FetchError> { Ok(self.current) }
    async fn funding_history(&self, _symbol: &str, limit: usize) -> Result<Vec<f64>, FetchError> {
        Ok(self.history.iter().rev().take(limit).rev().copied().collect())
    }
}

/// Current rate works, history endpoint fails.
pub struct FailingFunding;

#[async_trait]
impl FundingProvider for FailingFunding {
    async fn current_funding(&self, _symbol: &str) -> Result<f64, FetchError> { Ok(0.0003) }
    async fn funding_history(&self, _symbol: &str, _limit: usize) -> Result<Vec<f64>, FetchError> {
        Err(FetchError::Malformed("fundingRate=\"x\"".into()))
    }
}

pub struct StubOi(pub OpenInterestSeries);

#[async_trait]
impl OpenInterestProvider for StubOi {
    async fn oi_series(&self, _symbol: &str, _period: &str, _limit: usize) -> Result<OpenInterestSeries, FetchError> {
        Ok(self.0.clone())
    }
}

pub struct FailingOi;

#[async_trait]
impl OpenInterestProvider for FailingOi {
    async fn oi_series(&self, _symbol: &str, _period: &str, _limit: usize) -> Result<OpenInterestSeries, FetchError> {
        Err(FetchError::Exchange { code: -1121, msg: "Invalid symbol.".into() })
    }
}

pub struct DenyAll;

#[async_trait]
impl AccessGate for DenyAll {
    async fn authorize(&self, _req: &AccessRequest) -> Result<AccessDecision, GateError> {
        Ok(AccessDecision::Denied(AccessDenial {
            reason: "quota_exceeded".into(),
            plan: Some("FREE".into()),
            remaining: Some(0),
        }))
    }
}

pub struct BrokenGate;

#[async_trait]
impl AccessGate for BrokenGate {
    async fn authorize(&self, _req: &AccessRequest) -> Result<AccessDecision, GateError> {
        Err(GateError::Unavailable("rpc timeout".into()))
    }
}
