// src/metrics.rs
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fng_requests_total", "Scoring requests", &["timeframe"] // 15m|1h|4h|1d
    ).unwrap()
});

pub static FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fng_fallbacks_total", "Neutral substitutions", &["source"] // funding|oi
    ).unwrap()
});

pub static FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fng_failures_total", "Requests aborted", &["kind"] // validation|fetch|data|denied|gate
    ).unwrap()
});

pub static COMPUTE_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "fng_compute_latency_seconds",
        "Fetch + score latency",
        &["timeframe"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap()
});
