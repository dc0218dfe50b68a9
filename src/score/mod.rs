// src/score/mod.rs
pub mod window;
pub mod percentile;
pub mod indicators;
pub mod derivatives;
pub mod composite;

pub use composite::{combine, CompositeResult, Sentiment, Weights, WEIGHTS};
pub use derivatives::{funding_score, open_interest_score, FundingScore, OpenInterestScore};
pub use indicators::{base_scores, BaseScores, MomentumScore, RsiScore, VolatilityScore, VolumeScore};
pub use percentile::percentile_rank;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("insufficient data for {signal}: need {needed}, got {got}")]
    DataInsufficient { signal: &'static str, needed: usize, got: usize },
}

/// Neutral sub-score used whenever a signal has nothing to say.
pub const NEUTRAL: f64 = 50.0;
