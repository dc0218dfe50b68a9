// src/providers/binance.rs
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{FetchError, FundingProvider, OpenInterestProvider, PriceProvider};
use crate::config::{ms, FngConfig};
use crate::types::{Candle, OpenInterestPoint, OpenInterestSeries, PriceSeries, Timeframe};

const MAX_KLINES: usize = 1000;
const MAX_FUNDING: usize = 1000;
const MAX_OI: usize = 500;

/// Spot klines plus USDT-M futures funding and open interest.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    pub http: reqwest::Client,
    pub spot_base_url: String,
    pub futures_base_url: String,
    pub funding_now_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct KlineRow(
    i64,    // open time
    String, // open
    String, // high
    String, // low
    String, // close
    String, // volume
    i64,    // close time
    String, // quote asset volume
    u64,    // number of trades
    String, // taker buy base volume
    String, // taker buy quote volume
    String, // ignore
);

#[derive(Debug, Deserialize)]
struct PremiumIndex {
    #[serde(rename = "lastFundingRate")]
    last_funding_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FundingRow {
    #[serde(rename = "fundingRate")]
    funding_rate: String,
}

#[derive(Debug, Deserialize)]
struct OiRow {
    timestamp: i64,
    #[serde(rename = "sumOpenInterest")]
    sum_open_interest: String,
    #[serde(rename = "sumOpenInterestValue")]
    sum_open_interest_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Err { code: i64, msg: String },
    Ok(T),
}

fn num(field: &str, raw: &str) -> Result<f64, FetchError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FetchError::Malformed(format!("{field}={raw:?}")))
}

impl BinanceClient {
    pub fn from_config(cfg: &FngConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(ms(cfg.http_timeout_ms)).build()?;
        Ok(Self {
            http,
            spot_base_url: cfg.spot_base_url.trim_end_matches('/').to_string(),
            futures_base_url: cfg.futures_base_url.trim_end_matches('/').to_string(),
            funding_now_timeout_ms: cfg.funding_now_timeout_ms,
        })
    }

    async fn get<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, FetchError> {
        let resp = req.send().await?;
        tracing::debug!(url = %resp.url(), status = %resp.status(), "binance response");
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), body });
        }
        let bytes = resp.bytes().await?;
        match serde_json::from_slice::<Reply<T>>(&bytes) {
            Ok(Reply::Ok(v)) => Ok(v),
            Ok(Reply::Err { code, msg }) => Err(FetchError::Exchange { code, msg }),
            Err(e) => Err(FetchError::Malformed(e.to_string())),
        }
    }
}

#[async_trait]
impl PriceProvider for BinanceClient {
    async fn price_series(&self, symbol: &str, tf: Timeframe, limit: usize) -> Result<PriceSeries, FetchError> {
        let limit = limit.min(MAX_KLINES).to_string();
        let req = self
            .http
            .get(format!("{}/api/v3/klines", self.spot_base_url))
            .query(&[("symbol", symbol), ("interval", tf.as_str()), ("limit", limit.as_str())]);
        let rows: Vec<KlineRow> = self.get(req).await?;

        let candles = rows
            .into_iter()
            .map(|k| {
                Ok(Candle {
                    open_time_ms: k.0,
                    open: num("open", &k.1)?,
                    high: num("high", &k.2)?,
                    low: num("low", &k.3)?,
                    close: num("close", &k.4)?,
                    volume: num("volume", &k.5)?,
                    close_time_ms: k.6,
                    quote_volume: num("quote_volume", &k.7)?,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;
        PriceSeries::new(candles).map_err(|e| FetchError::Malformed(e.into()))
    }
}

#[async_trait]
impl FundingProvider for BinanceClient {
    async fn current_funding(&self, symbol: &str) -> Result<f64, FetchError> {
        let req = self
            .http
            .get(format!("{}/fapi/v1/premiumIndex", self.futures_base_url))
            .query(&[("symbol", symbol)])
            .timeout(ms(self.funding_now_timeout_ms));
        let idx: PremiumIndex = self.get(req).await?;
        match idx.last_funding_rate.as_deref() {
            Some(raw) if !raw.trim().is_empty() => num("lastFundingRate", raw),
            _ => Ok(0.0),
        }
    }

    async fn funding_history(&self, symbol: &str, limit: usize) -> Result<Vec<f64>, FetchError> {
        let limit = limit.min(MAX_FUNDING).to_string();
        let req = self
            .http
            .get(format!("{}/fapi/v1/fundingRate", self.futures_base_url))
            .query(&[("symbol", symbol), ("limit", limit.as_str())]);
        let rows: Vec<FundingRow> = self.get(req).await?;
        rows.iter().map(|r| num("fundingRate", &r.funding_rate)).collect()
    }
}

#[async_trait]
impl OpenInterestProvider for BinanceClient {
    async fn oi_series(&self, symbol: &str, period: &str, limit: usize) -> Result<OpenInterestSeries, FetchError> {
        let limit = limit.min(MAX_OI).to_string();
        let req = self
            .http
            .get(format!("{}/futures/data/openInterestHist", self.futures_base_url))
            .query(&[("symbol", symbol), ("period", period), ("limit", limit.as_str())]);
        let rows: Vec<OiRow> = self.get(req).await?;

        let points = rows
            .iter()
            .map(|r| {
                Ok(OpenInterestPoint {
                    ts_ms: r.timestamp,
                    sum_open_interest: num("sumOpenInterest", &r.sum_open_interest)?,
                    sum_open_interest_value: num("sumOpenInterestValue", &r.sum_open_interest_value)?,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;
        OpenInterestSeries::new(points).map_err(|e| FetchError::Malformed(e.into()))
    }
}
