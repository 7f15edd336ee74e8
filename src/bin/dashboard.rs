//! Tokenwatch Dashboard
//!
//! Interactive terminal dashboard:
//! - `r` runs the pipeline once over `monitored_tokens`
//! - `t` / `d` show the blacklisted tokens / developers
//! - `a` shows the analysis view (default), `q` quits
//!
//! Usage:
//!   cargo run --release --bin dashboard 2> tokenwatch.log
//!
//! Environment variables:
//!   TOKENWATCH_CONFIG_PATH - Bot config JSON (default: config.json)
//!   TOKENWATCH_DB_PATH - SQLite database path (default: dex_tokens.db)
//!   RUST_LOG - Log filter (default: info)

use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokenwatch::{
    init_logging, ui, BlacklistStore, Pipeline, RuntimeConfig, SqliteTokenRepository,
    TokenRepository,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let runtime = RuntimeConfig::from_env();
    init_logging(&runtime);

    info!("🚀 Starting Tokenwatch dashboard");
    info!("   ├─ Config: {}", runtime.config_path);
    info!("   └─ Database: {}", runtime.db_path);

    let mut blacklist = BlacklistStore::open(&runtime.config_path)?;
    let config = blacklist.config().clone();

    let repository: Arc<dyn TokenRepository> =
        Arc::new(SqliteTokenRepository::new(&runtime.db_path)?);
    let pipeline = Pipeline::from_config(&config, repository)?;

    if let Err(e) = ui::run_dashboard(&pipeline, &mut blacklist, &config.monitored_tokens).await {
        error!("❌ Dashboard error: {}", e);
        return Err(e.into());
    }

    info!("✅ Dashboard closed");
    Ok(())
}
