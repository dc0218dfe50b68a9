// src/score/indicators.rs
use serde::Serialize;

use super::percentile::percentile_rank;
use super::window::{log_returns, median, rolling_std, Trailing};
use super::ScoreError;
use crate::types::PriceSeries;

pub const RSI_WINDOW: usize = 14;
pub const VOL_WINDOW: usize = 30;
pub const VOL_LOOKBACK: usize = 180; // reference sample for the current stdev
pub const VOLUME_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RsiScore {
    pub score: f64,
    pub rsi_raw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumScore {
    pub score: f64,
    pub ret_last: f64,
    pub rank: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityScore {
    pub score: f64,
    pub vol_cur: f64,
    pub rank: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeScore {
    pub score: f64,
    pub vol_mult_cur: f64,
    pub rank: f64,
}

/// The four sub-scores that share one price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseScores {
    pub rsi: RsiScore,
    pub momentum: MomentumScore,
    pub volatility: VolatilityScore,
    pub volume: VolumeScore,
}

/// RSI with exponential smoothing `alpha = 1/window`. The first bar has no
/// change and enters both averages as 0, so `window` closes are enough.
///
/// No losses and no gains (a flat tape) reads as 50.
pub fn rsi(closes: &[f64], window: usize) -> Result<f64, ScoreError> {
    let needed = window.max(1);
    if closes.len() < needed {
        return Err(ScoreError::DataInsufficient { signal: "rsi", needed, got: closes.len() });
    }
    let alpha = 1.0 / needed as f64;
    let (mut gain, mut loss) = (0.0, 0.0);
    for c in closes.windows(2).map(|w| w[1] - w[0]) {
        gain = (1.0 - alpha) * gain + alpha * c.max(0.0);
        loss = (1.0 - alpha) * loss + alpha * (-c).max(0.0);
    }
    Ok(match (gain > 0.0, loss > 0.0) {
        (false, false) => 50.0,
        (true, false) => 100.0,
        _ => 100.0 - 100.0 / (1.0 + gain / loss),
    })
}

/// 30 -> 0, 70 -> 100, clamped outside the band.
pub fn rsi_score(closes: &[f64]) -> Result<RsiScore, ScoreError> {
    let rsi_raw = rsi(closes, RSI_WINDOW)?;
    let score = ((rsi_raw - 30.0) / 40.0 * 100.0).clamp(0.0, 100.0);
    Ok(RsiScore { score, rsi_raw })
}

pub fn momentum_score(returns: &[f64]) -> Result<MomentumScore, ScoreError> {
    let ret_last = *returns
        .last()
        .ok_or(ScoreError::DataInsufficient { signal: "momentum", needed: 1, got: 0 })?;
    let rank = percentile_rank(returns, ret_last);
    Ok(MomentumScore { score: rank * 100.0, ret_last, rank })
}

/// Calm (low relative stdev) scores high. On a down bar the score is blended
/// with its mirror image, which pins it to 50; up bars keep the base score.
pub fn volatility_score(returns: &[f64]) -> VolatilityScore {
    let vol_hist = rolling_std(returns, VOL_WINDOW);
    let (vol_cur, rank) = match vol_hist.last() {
        Some(&cur) => {
            let reference = &vol_hist[vol_hist.len().saturating_sub(VOL_LOOKBACK)..];
            (cur, percentile_rank(reference, cur))
        }
        None => (0.0, 0.5),
    };
    let base = (1.0 - rank) * 100.0;
    let r1 = returns.last().copied().unwrap_or(0.0);
    let mirrored = if r1 < 0.0 { 100.0 - base } else { base };
    VolatilityScore { score: 0.5 * base + 0.5 * mirrored, vol_cur, rank }
}

/// `volume[t] / median(volume[t-29..=t])`, zero-median windows dropped.
pub fn volume_multiples(volumes: &[f64]) -> Vec<f64> {
    Trailing::full(volumes, VOLUME_WINDOW)
        .filter_map(|w| {
            let cur = *w.last()?;
            let m = cur / median(w)?;
            m.is_finite().then_some(m)
        })
        .collect()
}

pub fn volume_score(volumes: &[f64]) -> VolumeScore {
    let hist = volume_multiples(volumes);
    let vol_mult_cur = hist.last().copied().unwrap_or(1.0);
    let rank = percentile_rank(&hist, vol_mult_cur);
    VolumeScore { score: rank * 100.0, vol_mult_cur, rank }
}

/// RSI, momentum, volatility and volume anomaly from one price series.
/// Too few candles for RSI is an error; the rolling signals fall back to
/// neutral on their own.
pub fn base_scores(series: &PriceSeries) -> Result<BaseScores, ScoreError> {
    let closes = series.closes();
    let rsi = rsi_score(&closes)?;
    let returns = log_returns(&closes);
    let momentum = momentum_score(&returns)?;
    let volatility = volatility_score(&returns);
    let volume = volume_score(&series.volumes());
    Ok(BaseScores { rsi, momentum, volatility, volume })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candle;

    fn series(closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let candles = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Candle {
                open_time_ms: i as i64 * 86_400_000,
                open: c,
                high: c,
                low: c,
                close: c,
                volume: v,
                close_time_ms: (i as i64 + 1) * 86_400_000 - 1,
                quote_volume: c * v,
            })
            .collect();
        PriceSeries::new(candles).unwrap()
    }

    #[test]
    fn rsi_zero_seeded_by_hand() {
        // changes [-, +1, -1] with alpha 1/2: gain 0 -> 0.5 -> 0.25, loss 0 -> 0 -> 0.5
        let r = rsi(&[1.0, 2.0, 1.0], 2).unwrap();
        assert!((r - 100.0 / 3.0).abs() < 1e-12, "rsi={r}");
    }

    #[test]
    fn rsi_matches_zero_seeded_ewm_fixture() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let r = rsi_score(&closes).unwrap();
        assert!((r.rsi_raw - 54.17929542054697).abs() < 1e-9, "rsi={}", r.rsi_raw);
        assert!((r.score - 60.448238551367425).abs() < 1e-9);

        let r = rsi_score(&closes[..RSI_WINDOW]).unwrap();
        assert!((r.rsi_raw - 71.80241065373282).abs() < 1e-9, "rsi={}", r.rsi_raw);
        assert_eq!(r.score, 100.0);
    }

    #[test]
    fn rsi_needs_window_closes() {
        let rising: Vec<f64> = (0..RSI_WINDOW).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&rising, RSI_WINDOW), Ok(100.0));
        assert_eq!(
            rsi(&rising[..RSI_WINDOW - 1], RSI_WINDOW),
            Err(ScoreError::DataInsufficient { signal: "rsi", needed: 14, got: 13 })
        );
    }

    #[test]
    fn flat_closes_read_neutral() {
        let closes = vec![100.0; 50];
        let r = rsi_score(&closes).unwrap();
        assert_eq!(r.rsi_raw, 50.0);
        assert_eq!(r.score, 50.0);
    }

    #[test]
    fn one_way_tapes_saturate() {
        let up: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        assert_eq!(rsi_score(&up).unwrap().score, 100.0);
        assert_eq!(rsi_score(&down).unwrap().score, 0.0);
    }

    #[test]
    fn momentum_ranks_latest_return() {
        let m = momentum_score(&[0.01, -0.02, 0.03, 0.05]).unwrap();
        assert_eq!(m.score, 100.0);
        assert_eq!(m.ret_last, 0.05);
        let m = momentum_score(&[0.01, -0.02, 0.03, -0.05]).unwrap();
        assert_eq!(m.score, 25.0);
        assert!(momentum_score(&[]).is_err());
    }

    #[test]
    fn volatility_is_neutral_without_a_full_window() {
        let v = volatility_score(&[0.01; 10]);
        assert_eq!(v.vol_cur, 0.0);
        assert_eq!(v.rank, 0.5);
        assert_eq!(v.score, 50.0);
    }

    #[test]
    fn volatility_rewards_calm_on_up_bars() {
        // wide swings first, then a quiet stretch ending on a small gain
        let mut rets: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 0.05 } else { -0.05 }).collect();
        rets.extend((0..40).map(|i| if i % 2 == 0 { 0.002 } else { 0.001 }));
        let v = volatility_score(&rets);
        assert!(v.rank < 0.1, "rank={}", v.rank);
        assert!(v.score > 90.0);
    }

    #[test]
    fn volatility_down_bar_pins_to_fifty() {
        let mut rets: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 0.05 } else { -0.05 }).collect();
        rets.extend((0..40).map(|i| if i % 2 == 0 { 0.002 } else { -0.001 }));
        let v = volatility_score(&rets);
        assert!(rets.last().unwrap() < &0.0);
        assert!((v.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn volume_spike_on_last_bar_scores_top() {
        let mut vols = vec![1_000.0; 59];
        vols.push(5_000.0);
        let s = volume_score(&vols);
        assert_eq!(s.vol_mult_cur, 5.0);
        assert_eq!(s.score, 100.0);
    }

    #[test]
    fn volume_defaults_without_history() {
        let s = volume_score(&[1.0; 10]);
        assert_eq!(s.vol_mult_cur, 1.0);
        assert_eq!(s.score, 50.0);
        assert!(volume_multiples(&[0.0; 40]).is_empty());
    }

    #[test]
    fn base_scores_fail_fast_on_short_series() {
        let s = series(&[100.0; 10], &[1.0; 10]);
        assert!(matches!(base_scores(&s), Err(ScoreError::DataInsufficient { signal: "rsi", .. })));
    }

    #[test]
    fn steady_uptrend_scores_greedy_rsi() {
        let closes: Vec<f64> = (0..500).scan(100.0, |c, _| { let out = *c; *c *= 1.01; Some(out) }).collect();
        let s = series(&closes, &vec![1_000.0; 500]);
        let b = base_scores(&s).unwrap();
        assert_eq!(b.rsi.score, 100.0);
        // every return is ln(1.01) up to rounding, so momentum and volatility
        // only rank rounding noise here
        let returns = log_returns(&closes);
        assert!(returns.iter().all(|r| (r - 1.01f64.ln()).abs() < 1e-12));
        assert!(b.volatility.vol_cur < 1e-12);
        assert_eq!(b.volatility.score, (1.0 - b.volatility.rank) * 100.0);
        assert_eq!(b.momentum.score, b.momentum.rank * 100.0);
    }

    #[test]
    fn exactly_uniform_returns_tie_at_the_top() {
        // 2^-7 sums exactly, so every rolling stdev is exactly 0
        let returns = vec![0.0078125; 499];
        let m = momentum_score(&returns).unwrap();
        assert_eq!(m.rank, 1.0);
        assert_eq!(m.score, 100.0);

        let v = volatility_score(&returns);
        assert_eq!(v.vol_cur, 0.0);
        assert_eq!(v.rank, 1.0);
        assert_eq!(v.score, 0.0);
    }
}
