// src/score/derivatives.rs
use serde::Serialize;

use super::percentile::percentile_rank;
use super::window::{median, pct_changes, Trailing};
use super::NEUTRAL;
use crate::types::OpenInterestSeries;

pub const OI_MEDIAN_WINDOW: usize = 30;
pub const OI_MEDIAN_MIN_PERIODS: usize = 5;
const OI_LEVEL_WEIGHT: f64 = 0.6;
const OI_DELTA_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingScore {
    pub score: f64,
    pub rate: f64,  // latest funding rate, signed fraction per interval
    pub rank: f64,
}

impl FundingScore {
    /// Substituted when the funding source is unavailable.
    pub const NEUTRAL: FundingScore = FundingScore { score: NEUTRAL, rate: 0.0, rank: 0.5 };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenInterestScore {
    pub score: f64,        // 0.6 level + 0.4 delta
    pub oi_cur: f64,
    pub level_rank: f64,
    pub delta_score: f64,
    pub delta_rel: f64,    // (oi_cur - med30) / med30
    pub delta_rank: f64,
}

impl OpenInterestScore {
    /// Used for an empty series and for an unavailable source alike.
    pub const NEUTRAL: OpenInterestScore = OpenInterestScore {
        score: NEUTRAL,
        oi_cur: 0.0,
        level_rank: 0.5,
        delta_score: NEUTRAL,
        delta_rel: 0.0,
        delta_rank: 0.5,
    };
}

pub fn funding_score(current: f64, history: &[f64]) -> FundingScore {
    let rank = percentile_rank(history, current);
    FundingScore { score: rank * 100.0, rate: current, rank }
}

pub fn open_interest_score(series: &OpenInterestSeries) -> OpenInterestScore {
    let oi = series.values();
    let Some(&oi_cur) = oi.last() else {
        return OpenInterestScore::NEUTRAL;
    };
    let level_rank = percentile_rank(&oi, oi_cur);

    let med = Trailing::new(&oi, OI_MEDIAN_WINDOW, OI_MEDIAN_MIN_PERIODS)
        .last()
        .and_then(median);
    let delta_rel = match med {
        Some(m) if m > 0.0 => (oi_cur - m) / m,
        _ => 0.0,
    };
    let delta_rank = percentile_rank(&pct_changes(&oi), delta_rel);

    let delta_score = delta_rank * 100.0;
    let score = OI_LEVEL_WEIGHT * (level_rank * 100.0) + OI_DELTA_WEIGHT * delta_score;
    OpenInterestScore { score, oi_cur, level_rank, delta_score, delta_rel, delta_rank }
}
