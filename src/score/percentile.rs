// src/score/percentile.rs

/// Empirical CDF lookup: share of `sample` at or below `x`.
///
/// Empty samples and non-finite `x` rank as 0.5 so bad upstream data lands
/// on neutral instead of poisoning the blend.
pub fn percentile_rank(sample: &[f64], x: f64) -> f64 {
    if sample.is_empty() || !x.is_finite() {
        return 0.5;
    }
    let at_or_below = sample.iter().filter(|v| **v <= x).count();
    at_or_below as f64 / sample.len() as f64
}
