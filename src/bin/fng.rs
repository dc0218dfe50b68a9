// src/bin/fng.rs
use clap::Parser;
use fng_index::config::FngConfig;
use fng_index::{FngEngine, Timeframe};
use tracing_subscriber::EnvFilter;

/// Fear & Greed index for a Binance pair.
#[derive(Debug, Parser)]
#[command(name = "fng", version)]
struct Args {
    /// Binance symbol, e.g. SOLUSDT
    symbol: Option<String>,
    /// 15m | 1h | 4h | 1d
    #[arg(long)]
    tf: Option<String>,
    /// Print weights, scores and raw diagnostics
    #[arg(long)]
    components: bool,
    /// Score every supported timeframe concurrently
    #[arg(long)]
    all_timeframes: bool,
    /// TOML config file (overrides FNG_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => FngConfig::load(path)?,
        None => FngConfig::from_env()?,
    };
    let symbol = args.symbol.clone().unwrap_or_else(|| cfg.default_symbol.clone());
    let tf = args.tf.clone().unwrap_or_else(|| cfg.default_timeframe.clone());
    let engine = FngEngine::binance(cfg)?;
    let now = chrono::Utc::now();

    if args.all_timeframes {
        let mut out = serde_json::Map::new();
        for (tf, res) in engine.compute_timeframes(&symbol, &Timeframe::ALL).await? {
            let v = match res {
                Ok(r) => serde_json::to_value(r.index_report(now))?,
                Err(e) => {
                    tracing::warn!(tf = %tf, kind = e.kind(), "timeframe failed: {e}");
                    serde_json::json!({ "error": e.to_string(), "kind": e.kind() })
                }
            };
            out.insert(tf.to_string(), v);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let result = engine.compute_index(&symbol, &tf).await?;
    let body = if args.components {
        serde_json::to_string_pretty(&result.components_report(now))?
    } else {
        serde_json::to_string_pretty(&result.index_report(now))?
    };
    println!("{body}");
    Ok(())
}
