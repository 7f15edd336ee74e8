//! # tokenwatch
//!
//! Single-operator token screening bot:
//!
//! 1. Fetch pair data for each monitored address (DexScreener)
//! 2. Apply liquidity / market-cap thresholds
//! 3. Flag bundled supply and blacklist the token and its developer
//! 4. Ask the contract audit service for a status label
//! 5. Store qualifying observations in SQLite and place a buy order
//! 6. Summarize stored observations (rugged / bundled subsets)
//!
//! ## Module Organization
//!
//! - `config` - Environment settings and the persisted JSON bot config
//! - `market_data` - Pair records and the DexScreener client
//! - `filters` - Liquidity / market-cap gate
//! - `risk` - Bundled-supply check and audit client
//! - `blacklist` - File-backed token/developer blacklist
//! - `db` - Token observations and the SQLite repository
//! - `trade` - Trade executor
//! - `notify` - Optional Telegram notifications
//! - `analysis` - Descriptive statistics
//! - `pipeline` - Orchestration of the steps above
//! - `state`, `ui` - Terminal dashboard

pub mod analysis;
pub mod blacklist;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod market_data;
pub mod notify;
pub mod pipeline;
pub mod risk;
pub mod state;
pub mod trade;
pub mod ui;

pub use blacklist::BlacklistStore;
pub use config::{BotConfig, RuntimeConfig};
pub use db::{SqliteTokenRepository, TokenObservation, TokenRepository};
pub use error::{Result, TokenwatchError};
pub use pipeline::{Pipeline, RunReport, TokenOutcome};

/// Initialize `env_logger` writing to stderr, defaulting to `info`
pub fn init_logging(config: &RuntimeConfig) {
    let mut builder = if config.rust_log.is_some() {
        env_logger::Builder::from_default_env()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    };

    // reqwest/hyper connection chatter is rarely useful here
    builder.filter_module("hyper", log::LevelFilter::Warn);
    builder.filter_module("reqwest", log::LevelFilter::Warn);

    builder.target(env_logger::Target::Stderr).init();
}
