// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid tf={0}. Allowed: 15m, 1h, 4h, 1d")]
    InvalidTimeframe(String),
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
    #[error("missing install id")]
    MissingInstallId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Timeframe::M15, Timeframe::H1, Timeframe::H4, Timeframe::D1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// Open-interest granularity for this timeframe. Binance accepts the same
    /// tokens for OI periods, so the mapping is 1:1.
    pub fn oi_period(&self) -> &'static str { self.as_str() }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15m" => Ok(Timeframe::M15),
            "1h" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" => Ok(Timeframe::D1),
            other => Err(ValidationError::InvalidTimeframe(other.to_string())),
        }
    }
}

/// Exchange pair symbol, e.g. "SOLUSDT". Trimmed and upper-cased on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let s = raw.trim().to_ascii_uppercase();
        let ok = (2..=20).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric());
        if !ok {
            return Err(ValidationError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,  // unix ms
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,        // base asset volume
    pub close_time_ms: i64,
    pub quote_volume: f64,
}

/// Candles ordered by strictly increasing open time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, &'static str> {
        if candles.windows(2).any(|w| w[1].open_time_ms <= w[0].open_time_ms) {
            return Err("candles not strictly increasing by open time");
        }
        if candles.iter().any(|c| !c.close.is_finite() || c.close <= 0.0) {
            return Err("non-positive close");
        }
        if candles.iter().any(|c| !c.volume.is_finite() || c.volume < 0.0) {
            return Err("invalid volume");
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] { &self.candles }
    pub fn len(&self) -> usize { self.candles.len() }
    pub fn is_empty(&self) -> bool { self.candles.is_empty() }
    pub fn closes(&self) -> Vec<f64> { self.candles.iter().map(|c| c.close).collect() }
    pub fn volumes(&self) -> Vec<f64> { self.candles.iter().map(|c| c.volume).collect() }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestPoint {
    pub ts_ms: i64,
    pub sum_open_interest: f64,
    pub sum_open_interest_value: f64,
}

/// Open-interest history ordered by strictly increasing timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpenInterestSeries {
    points: Vec<OpenInterestPoint>,
}

impl OpenInterestSeries {
    pub fn new(points: Vec<OpenInterestPoint>) -> Result<Self, &'static str> {
        if points.windows(2).any(|w| w[1].ts_ms <= w[0].ts_ms) {
            return Err("open interest not strictly increasing by timestamp");
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[OpenInterestPoint] { &self.points }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn values(&self) -> Vec<f64> { self.points.iter().map(|p| p.sum_open_interest).collect() }
}

#[inline]
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}
