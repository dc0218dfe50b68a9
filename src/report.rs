// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::score::composite::{CompositeResult, Sentiment, Weights};
use crate::types::{round_to, Symbol, Timeframe};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub rsi: f64,
    pub mom: f64,
    pub vol: f64,
    pub volm: f64,
    pub funding: f64,
    pub oi: f64,
}

impl SubScores {
    fn rounded(&self, decimals: i32) -> Self {
        Self {
            rsi: round_to(self.rsi, decimals),
            mom: round_to(self.mom, decimals),
            vol: round_to(self.vol, decimals),
            volm: round_to(self.volm, decimals),
            funding: round_to(self.funding, decimals),
            oi: round_to(self.oi, decimals),
        }
    }
}

/// Flat diagnostics behind each sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawDiagnostics {
    pub rsi_raw: f64,
    pub ret_last: f64,
    pub vol_cur: f64,
    pub vol_mult_cur: f64,
    pub funding_now: f64,
    pub funding_p: f64,
    pub funding_fallback: bool,
    pub oi: f64,
    pub oi_cur: f64,
    pub oi_p: f64,
    pub oi_delta: f64,
    pub oi_delta_val: f64,
    pub oi_delta_p: f64,
    pub oi_fallback: bool,
}

/// Summary view: index to 1 decimal, components to 2.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub coin: Symbol,
    pub tf: Timeframe,
    pub value: f64,
    pub label: Sentiment,
    pub components: SubScores,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Full view with weights and raw diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentsReport {
    pub coin: Symbol,
    pub tf: Timeframe,
    pub value: f64,
    pub label: Sentiment,
    pub weights: Weights,
    pub scores: SubScores,
    pub raw: RawDiagnostics,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl CompositeResult {
    pub fn scores(&self) -> SubScores {
        SubScores {
            rsi: self.base.rsi.score,
            mom: self.base.momentum.score,
            vol: self.base.volatility.score,
            volm: self.base.volume.score,
            funding: self.funding.score,
            oi: self.open_interest.score,
        }
    }

    pub fn raw(&self) -> RawDiagnostics {
        let oi = &self.open_interest;
        RawDiagnostics {
            rsi_raw: self.base.rsi.rsi_raw,
            ret_last: self.base.momentum.ret_last,
            vol_cur: self.base.volatility.vol_cur,
            vol_mult_cur: self.base.volume.vol_mult_cur,
            funding_now: self.funding.rate,
            funding_p: self.funding.rank,
            funding_fallback: self.funding_fallback,
            oi: oi.score,
            oi_cur: oi.oi_cur,
            oi_p: oi.level_rank,
            oi_delta: oi.delta_score,
            oi_delta_val: oi.delta_rel,
            oi_delta_p: oi.delta_rank,
            oi_fallback: self.oi_fallback,
        }
    }

    pub fn index_report(&self, updated_at: DateTime<Utc>) -> IndexReport {
        IndexReport {
            coin: self.symbol.clone(),
            tf: self.timeframe,
            value: round_to(self.index_value, 1),
            label: self.label,
            components: self.scores().rounded(2),
            updated_at,
        }
    }

    pub fn components_report(&self, updated_at: DateTime<Utc>) -> ComponentsReport {
        ComponentsReport {
            coin: self.symbol.clone(),
            tf: self.timeframe,
            value: round_to(self.index_value, 1),
            label: self.label,
            weights: self.weights,
            scores: self.scores(),
            raw: self.raw(),
            updated_at,
        }
    }
}
