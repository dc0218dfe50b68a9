// src/engine.rs
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::FngConfig;
use crate::gate::{AccessDecision, AccessDenial, AccessGate, AccessGrant, AccessRequest, GateError, OpenGate};
use crate::providers::binance::BinanceClient;
use crate::providers::{FetchError, FundingProvider, OpenInterestProvider, PriceProvider};
use crate::score::composite::CompositeResult;
use crate::score::{self, combine, FundingScore, OpenInterestScore, ScoreError, WEIGHTS};
use crate::types::{Symbol, Timeframe, ValidationError};

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("price series unavailable: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    DataInsufficient(#[from] ScoreError),
    #[error("access denied: {}", .0.reason)]
    AccessDenied(AccessDenial),
    #[error(transparent)]
    Gate(#[from] GateError),
}

impl EngineError {
    /// Short code for logs and status mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_)       => "validation",
            EngineError::Fetch(_)            => "fetch",
            EngineError::DataInsufficient(_) => "data",
            EngineError::AccessDenied(_)     => "denied",
            EngineError::Gate(_)             => "gate",
        }
    }
}

/// Caller-side inputs for a gated lookup, still unvalidated.
#[derive(Debug, Clone, Default)]
pub struct GatedRequest {
    pub install_id: String,
    pub api_key: Option<String>,
    pub symbol: String,
    pub timeframe: String,
}

pub struct FngEngine {
    pub cfg: FngConfig,
    prices: Arc<dyn PriceProvider>,
    funding: Arc<dyn FundingProvider>,
    oi: Arc<dyn OpenInterestProvider>,
    gate: Arc<dyn AccessGate>,
}

impl FngEngine {
    pub fn new(
        cfg: FngConfig,
        prices: Arc<dyn PriceProvider>,
        funding: Arc<dyn FundingProvider>,
        oi: Arc<dyn OpenInterestProvider>,
    ) -> Self {
        Self { cfg, prices, funding, oi, gate: Arc::new(OpenGate) }
    }

    /// All three feeds from one Binance client.
    pub fn binance(cfg: FngConfig) -> Result<Self, FetchError> {
        let client = Arc::new(BinanceClient::from_config(&cfg)?);
        Ok(Self::new(cfg, client.clone(), client.clone(), client))
    }

    pub fn with_gate(mut self, gate: Arc<dyn AccessGate>) -> Self {
        self.gate = gate;
        self
    }

    pub async fn compute_index(&self, symbol: &str, timeframe: &str) -> Result<CompositeResult, EngineError> {
        let (symbol, tf) = parse_inputs(symbol, timeframe).map_err(fail)?;
        self.compute(&symbol, tf).await
    }

    /// Same computation as [`compute_index`](Self::compute_index); the caller
    /// picks how much of the diagnostics to surface.
    pub async fn compute_subscores(&self, symbol: &str, timeframe: &str) -> Result<CompositeResult, EngineError> {
        self.compute_index(symbol, timeframe).await
    }

    /// One independent request per timeframe, run concurrently. Results keep
    /// the order of `timeframes`.
    pub async fn compute_timeframes(
        &self,
        symbol: &str,
        timeframes: &[Timeframe],
    ) -> Result<Vec<(Timeframe, Result<CompositeResult, EngineError>)>, ValidationError> {
        let symbol = Symbol::parse(symbol).inspect_err(|_| note_failure("validation"))?;
        let futs = timeframes.iter().map(|&tf| {
            let symbol = &symbol;
            async move { (tf, self.compute(symbol, tf).await) }
        });
        Ok(join_all(futs).await)
    }

    /// Validate, ask the gate, and only then score. A denial never reaches
    /// the providers.
    pub async fn compute_gated(&self, req: &GatedRequest) -> Result<(AccessGrant, CompositeResult), EngineError> {
        let (symbol, tf) = parse_inputs(&req.symbol, &req.timeframe).map_err(fail)?;
        let install_id = req.install_id.trim();
        if install_id.is_empty() {
            return Err(fail(ValidationError::MissingInstallId.into()));
        }
        let access = AccessRequest {
            install_id: install_id.to_string(),
            api_key: req.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()).map(String::from),
            symbol: symbol.to_string(),
        };
        let grant = match self.gate.authorize(&access).await.map_err(|e| fail(e.into()))? {
            AccessDecision::Approved(grant) => grant,
            AccessDecision::Denied(denial) => {
                debug!(symbol = %symbol, reason = %denial.reason, "pair access denied");
                return Err(fail(EngineError::AccessDenied(denial)));
            }
        };
        let result = self.compute(&symbol, tf).await?;
        Ok((grant, result))
    }

    pub async fn compute(&self, symbol: &Symbol, tf: Timeframe) -> Result<CompositeResult, EngineError> {
        let started = Instant::now();
        note_request(tf);
        let s = symbol.as_str();

        let (prices, funding, oi) = futures::join!(
            self.prices.price_series(s, tf, self.cfg.kline_limit),
            self.funding_score(s),
            self.oi_score(s, tf),
        );

        let series = prices.map_err(|e| fail(e.into()))?;
        let base = score::base_scores(&series).map_err(|e| fail(e.into()))?;

        let (funding, funding_fallback) = match funding {
            Ok(f) => (f, false),
            Err(e) => {
                warn!(symbol = %s, error = %e, "funding unavailable, using neutral");
                note_fallback("funding");
                (FundingScore::NEUTRAL, true)
            }
        };
        let (open_interest, oi_fallback) = match oi {
            Ok(o) => (o, false),
            Err(e) => {
                warn!(symbol = %s, tf = %tf, error = %e, "open interest unavailable, using neutral");
                note_fallback("oi");
                (OpenInterestScore::NEUTRAL, true)
            }
        };

        let (index_value, label) = combine(&WEIGHTS, &base, &funding, &open_interest);
        note_latency(tf, started.elapsed().as_secs_f64());
        debug!(symbol = %s, tf = %tf, value = index_value, label = %label, candles = series.len(), "index computed");

        Ok(CompositeResult {
            symbol: symbol.clone(),
            timeframe: tf,
            index_value,
            label,
            base,
            funding,
            open_interest,
            funding_fallback,
            oi_fallback,
            weights: WEIGHTS,
        })
    }

    async fn funding_score(&self, symbol: &str) -> Result<FundingScore, FetchError> {
        let (current, history) = futures::try_join!(
            self.funding.current_funding(symbol),
            self.funding.funding_history(symbol, self.cfg.funding_history_limit),
        )?;
        Ok(score::funding_score(current, &history))
    }

    async fn oi_score(&self, symbol: &str, tf: Timeframe) -> Result<OpenInterestScore, FetchError> {
        let series = self.oi.oi_series(symbol, tf.oi_period(), self.cfg.oi_limit).await?;
        Ok(score::open_interest_score(&series))
    }
}

fn parse_inputs(symbol: &str, timeframe: &str) -> Result<(Symbol, Timeframe), EngineError> {
    let tf: Timeframe = timeframe.parse()?;
    let symbol = Symbol::parse(symbol)?;
    Ok((symbol, tf))
}

fn fail(e: EngineError) -> EngineError {
    note_failure(e.kind());
    e
}

#[cfg(feature = "metrics")]
fn note_request(tf: Timeframe) { crate::metrics::REQUESTS_TOTAL.with_label_values(&[tf.as_str()]).inc(); }
#[cfg(feature = "metrics")]
fn note_fallback(source: &str) { crate::metrics::FALLBACKS_TOTAL.with_label_values(&[source]).inc(); }
#[cfg(feature = "metrics")]
fn note_failure(kind: &str) { crate::metrics::FAILURES_TOTAL.with_label_values(&[kind]).inc(); }
#[cfg(feature = "metrics")]
fn note_latency(tf: Timeframe, secs: f64) {
    crate::metrics::COMPUTE_LATENCY.with_label_values(&[tf.as_str()]).observe(secs);
}

#[cfg(not(feature = "metrics"))]
fn note_request(_tf: Timeframe) {}
#[cfg(not(feature = "metrics"))]
fn note_fallback(_source: &str) {}
#[cfg(not(feature = "metrics"))]
fn note_failure(_kind: &str) {}
#[cfg(not(feature = "metrics"))]
fn note_latency(_tf: Timeframe, _secs: f64) {}
