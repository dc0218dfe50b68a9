// src/score/composite.rs
use serde::Serialize;
use std::fmt;

use super::derivatives::{FundingScore, OpenInterestScore};
use super::indicators::BaseScores;
use super::NEUTRAL;
use crate::types::{Symbol, Timeframe};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub rsi: f64,
    pub mom: f64,
    pub vol: f64,
    pub volm: f64,
    pub funding: f64,
    pub oi: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 { self.rsi + self.mom + self.vol + self.volm + self.funding + self.oi }
}

pub const WEIGHTS: Weights = Weights {
    rsi: 0.25,
    mom: 0.20,
    vol: 0.15,
    volm: 0.15,
    funding: 0.15,
    oi: 0.10,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl Sentiment {
    /// `<25` | `[25,45)` | `[45,55]` | `(55,76)` | `>=76`
    pub fn from_index(v: f64) -> Self {
        if v < 25.0 {
            Sentiment::ExtremeFear
        } else if v < 45.0 {
            Sentiment::Fear
        } else if v <= 55.0 {
            Sentiment::Neutral
        } else if v < 76.0 {
            Sentiment::Greed
        } else {
            Sentiment::ExtremeGreed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::ExtremeFear => "Extreme Fear",
            Sentiment::Fear => "Fear",
            Sentiment::Neutral => "Neutral",
            Sentiment::Greed => "Greed",
            Sentiment::ExtremeGreed => "Extreme Greed",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Scoring outcome for one (symbol, timeframe) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeResult {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub index_value: f64,
    pub label: Sentiment,
    pub base: BaseScores,
    pub funding: FundingScore,
    pub open_interest: OpenInterestScore,
    pub funding_fallback: bool,
    pub oi_fallback: bool,
    pub weights: Weights,
}

#[inline]
fn finite_or_neutral(x: f64) -> f64 { if x.is_finite() { x } else { NEUTRAL } }

/// Weighted blend of the six sub-scores, clamped to [0, 100].
pub fn combine(
    w: &Weights,
    base: &BaseScores,
    funding: &FundingScore,
    oi: &OpenInterestScore,
) -> (f64, Sentiment) {
    let parts = [
        (w.rsi, base.rsi.score),
        (w.mom, base.momentum.score),
        (w.vol, base.volatility.score),
        (w.volm, base.volume.score),
        (w.funding, funding.score),
        (w.oi, oi.score),
    ];
    let raw: f64 = parts.iter().map(|(wi, s)| wi * finite_or_neutral(*s)).sum();
    let v = finite_or_neutral(raw).clamp(0.0, 100.0);
    (v, Sentiment::from_index(v))
}
