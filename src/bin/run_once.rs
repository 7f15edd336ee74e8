//! Headless single pass
//!
//! Runs the pipeline once over `monitored_tokens`, logs every event and the
//! analysis summary, then exits. Exit code is non-zero only when the run
//! aborted (config or storage failure); upstream failures are per-token.
//!
//! Usage:
//!   cargo run --release --bin run_once

use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokenwatch::{
    analysis::Describe, init_logging, BlacklistStore, Pipeline, RuntimeConfig,
    SqliteTokenRepository, TokenRepository,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let runtime = RuntimeConfig::from_env();
    init_logging(&runtime);

    let mut blacklist = BlacklistStore::open(&runtime.config_path)?;
    let config = blacklist.config().clone();

    let repository: Arc<dyn TokenRepository> =
        Arc::new(SqliteTokenRepository::new(&runtime.db_path)?);
    let pipeline = Pipeline::from_config(&config, repository)?;

    let report = pipeline.run_once(&config.monitored_tokens, &mut blacklist).await;

    if let Some(analysis) = &report.analysis {
        info!("📊 Token Analysis: {} rows stored", analysis.observations.len());
        log_describe("Rugged Tokens Analysis", &analysis.rugged);
        log_describe("Bundled Supply Tokens Analysis", &analysis.bundled);
    }

    info!(
        "✅ Done: {} processed, {} inserted, {} blacklisted tokens",
        report.tokens.len(),
        report.inserted_count(),
        blacklist.tokens().len()
    );

    if let Some(reason) = report.aborted {
        error!("❌ {}", reason);
        return Err(reason.into());
    }
    Ok(())
}

fn log_describe(title: &str, describe: &Describe) {
    info!("{} ({} rows)", title, describe.count());
    for (name, stats) in &describe.columns {
        info!(
            "   ├─ {:<10} mean={:?} std={:?} min={:?} 25%={:?} 50%={:?} 75%={:?} max={:?}",
            name, stats.mean, stats.std, stats.min, stats.p25, stats.p50, stats.p75, stats.max
        );
    }
}
