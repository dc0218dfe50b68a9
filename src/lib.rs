// src/lib.rs
pub mod types;
pub mod config;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod gate;
pub mod providers;
pub mod score;
pub mod report;
pub mod engine;

pub use engine::{EngineError, FngEngine, GatedRequest};
pub use score::{CompositeResult, Sentiment};
pub use types::{Symbol, Timeframe};
