// src/score/window.rs
//! Slice-based rolling windows. Each window ends at (and includes) the
//! current index, like a trailing dataframe `rolling(n)`.

/// Trailing windows over `values`: one per index that has at least
/// `min_periods` observations in its `size`-long lookback.
pub struct Trailing<'a> {
    values: &'a [f64],
    size: usize,
    min_periods: usize,
    end: usize,
}

impl<'a> Trailing<'a> {
    pub fn new(values: &'a [f64], size: usize, min_periods: usize) -> Self {
        let min_periods = min_periods.clamp(1, size.max(1));
        Self { values, size: size.max(1), min_periods, end: min_periods }
    }

    /// Only full windows.
    pub fn full(values: &'a [f64], size: usize) -> Self { Self::new(values, size, size) }
}

impl<'a> Iterator for Trailing<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.end > self.values.len() {
            return None;
        }
        let start = self.end.saturating_sub(self.size);
        let w = &self.values[start..self.end];
        self.end += 1;
        Some(w)
    }
}

/// `ln(x[t]) - ln(x[t-1])`; the undefined first element is dropped.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1].ln() - w[0].ln()).collect()
}

/// Relative change `(x[t] - x[t-1]) / x[t-1]`, dropping non-finite ratios.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|d| d.is_finite())
        .collect()
}

/// Median; even-length windows average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;
    Some(if v.len() % 2 == 0 { 0.5 * (v[mid - 1] + v[mid]) } else { v[mid] })
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

pub fn rolling_std(values: &[f64], size: usize) -> Vec<f64> {
    Trailing::full(values, size).filter_map(sample_std).collect()
}
