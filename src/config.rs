// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FngConfig {
    #[serde(default = "d_spot_url")]             pub spot_base_url: String,
    #[serde(default = "d_futures_url")]          pub futures_base_url: String,
    #[serde(default = "d_kline_limit")]          pub kline_limit: usize,
    #[serde(default = "d_funding_limit")]        pub funding_history_limit: usize,
    #[serde(default = "d_oi_limit")]             pub oi_limit: usize,
    #[serde(default = "d_http_timeout")]         pub http_timeout_ms: u64,
    #[serde(default = "d_funding_now_timeout")]  pub funding_now_timeout_ms: u64,
    #[serde(default = "d_symbol")]               pub default_symbol: String,
    #[serde(default = "d_timeframe")]            pub default_timeframe: String,
}
fn d_spot_url() -> String { "https://api.binance.com".into() }
fn d_futures_url() -> String { "https://fapi.binance.com".into() } // USDT-M futures
fn d_kline_limit() -> usize { 500 }
fn d_funding_limit() -> usize { 500 }
fn d_oi_limit() -> usize { 200 }
fn d_http_timeout() -> u64 { 20_000 }
fn d_funding_now_timeout() -> u64 { 15_000 }
fn d_symbol() -> String { "SOLUSDT".into() }
fn d_timeframe() -> String { "1d".into() }
#[inline]
pub fn ms(d: u64) -> std::time::Duration { Duration::from_millis(d) }

impl Default for FngConfig {
    fn default() -> Self {
        Self {
            spot_base_url: d_spot_url(),
            futures_base_url: d_futures_url(),
            kline_limit: d_kline_limit(),
            funding_history_limit: d_funding_limit(),
            oi_limit: d_oi_limit(),
            http_timeout_ms: d_http_timeout(),
            funding_now_timeout_ms: d_funding_now_timeout(),
            default_symbol: d_symbol(),
            default_timeframe: d_timeframe(),
        }
    }
}

impl FngConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// `.env` first, then the TOML file named by `FNG_CONFIG` (if any), then
    /// `FNG_SPOT_URL` / `FNG_FUTURES_URL` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let mut cfg = match std::env::var("FNG_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var("FNG_SPOT_URL") { cfg.spot_base_url = url; }
        if let Ok(url) = std::env::var("FNG_FUTURES_URL") { cfg.futures_base_url = url; }
        Ok(cfg)
    }
}
