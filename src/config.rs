//! Configuration for tokenwatch
//!
//! Two layers:
//! - `RuntimeConfig`: file locations and log filter, from environment variables
//! - `BotConfig`: the persisted JSON document (credentials, filter thresholds,
//!   blacklists, monitored addresses)
//!
//! The `BotConfig` value is loaded once and passed explicitly into each
//! component. Only `BlacklistStore` rewrites the file.

use crate::error::{Result, TokenwatchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_DEXSCREENER_API_URL: &str = "https://api.dexscreener.com/latest/dex/tokens/";
pub const DEFAULT_TRADE_API_URL: &str = "https://bonkbot.com/api/trade";

/// Process-level settings loaded from environment variables
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Path to the JSON bot configuration (also holds the blacklists)
    pub config_path: String,

    /// Path to SQLite database file
    pub db_path: String,

    pub rust_log: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `TOKENWATCH_CONFIG_PATH` (default: config.json)
    /// - `TOKENWATCH_DB_PATH` (default: dex_tokens.db)
    /// - `RUST_LOG` (optional)
    pub fn from_env() -> Self {
        Self {
            config_path: env::var("TOKENWATCH_CONFIG_PATH")
                .unwrap_or_else(|_| "config.json".to_string()),

            db_path: env::var("TOKENWATCH_DB_PATH")
                .unwrap_or_else(|_| "dex_tokens.db".to_string()),

            rust_log: env::var("RUST_LOG").ok(),
        }
    }
}

/// Liquidity and market-cap thresholds (USD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub min_liquidity: f64,
    pub min_market_cap: f64,
}

/// Telegram chat id, kept in whichever form the file used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Number(id) => write!(f, "{}", id),
            ChatId::Text(id) => f.write_str(id),
        }
    }
}

/// The persisted bot configuration document
///
/// Settings left at their default are not written back, so a rewrite only
/// adds what the operator (or the blacklist) put there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<ChatId>,

    /// Bearer credential for the trade endpoint
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bonkbot_api_key: String,

    /// Contract audit endpoint; queried with `?address=<token>`
    pub rugcheck_api_url: String,

    pub filters: FilterConfig,

    #[serde(default)]
    pub blacklisted_coins: Vec<String>,

    #[serde(default)]
    pub blacklisted_devs: Vec<String>,

    /// Addresses processed, in order, by each pipeline run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitored_tokens: Vec<String>,

    #[serde(
        default = "default_dexscreener_api_url",
        skip_serializing_if = "is_default_dexscreener_api_url"
    )]
    pub dexscreener_api_url: String,

    #[serde(
        default = "default_trade_api_url",
        skip_serializing_if = "is_default_trade_api_url"
    )]
    pub trade_api_url: String,

    #[serde(
        default = "default_http_timeout_secs",
        skip_serializing_if = "is_default_http_timeout_secs"
    )]
    pub http_timeout_secs: u64,

    /// Price (USD) above which an observation is flagged as pumped
    #[serde(
        default = "default_pump_price_threshold",
        skip_serializing_if = "is_default_pump_price_threshold"
    )]
    pub pump_price_threshold: f64,

    /// Keys this crate does not know about, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PUMP_PRICE_THRESHOLD: f64 = 1000.0;

fn default_dexscreener_api_url() -> String {
    DEFAULT_DEXSCREENER_API_URL.to_string()
}

fn default_trade_api_url() -> String {
    DEFAULT_TRADE_API_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_pump_price_threshold() -> f64 {
    DEFAULT_PUMP_PRICE_THRESHOLD
}

fn is_default_dexscreener_api_url(url: &str) -> bool {
    url == DEFAULT_DEXSCREENER_API_URL
}

fn is_default_trade_api_url(url: &str) -> bool {
    url == DEFAULT_TRADE_API_URL
}

fn is_default_http_timeout_secs(secs: &u64) -> bool {
    *secs == DEFAULT_HTTP_TIMEOUT_SECS
}

fn is_default_pump_price_threshold(threshold: &f64) -> bool {
    *threshold == DEFAULT_PUMP_PRICE_THRESHOLD
}

impl BotConfig {
    /// Load and validate the configuration document
    ///
    /// Duplicate blacklist entries are collapsed (first occurrence wins).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TokenwatchError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;

        let mut config: BotConfig = serde_json::from_str(&json)?;
        dedupe(&mut config.blacklisted_coins);
        dedupe(&mut config.blacklisted_devs);
        config.validate()?;

        log::info!(
            "Loaded config from {}: {} monitored, {} blacklisted tokens, {} blacklisted devs",
            path.display(),
            config.monitored_tokens.len(),
            config.blacklisted_coins.len(),
            config.blacklisted_devs.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let FilterConfig {
            min_liquidity,
            min_market_cap,
        } = self.filters;

        if !min_liquidity.is_finite() || min_liquidity < 0.0 {
            return Err(TokenwatchError::config_error(
                "filters.min_liquidity must be a non-negative number",
            ));
        }
        if !min_market_cap.is_finite() || min_market_cap < 0.0 {
            return Err(TokenwatchError::config_error(
                "filters.min_market_cap must be a non-negative number",
            ));
        }
        if self.rugcheck_api_url.trim().is_empty() {
            return Err(TokenwatchError::config_error("rugcheck_api_url is empty"));
        }
        if self.http_timeout_secs == 0 {
            return Err(TokenwatchError::config_error(
                "http_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Rewrite the document at `path` via write-to-temp-then-rename
    ///
    /// The temp file lives in the destination directory so the rename never
    /// crosses filesystems.
    pub fn save_atomic(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| TokenwatchError::Io(e.error))?;

        log::debug!("Wrote config to {}", path.display());
        Ok(())
    }
}

fn dedupe(entries: &mut Vec<String>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "telegram_bot_token": "123:abc",
        "telegram_chat_id": 987654,
        "bonkbot_api_key": "secret",
        "rugcheck_api_url": "https://rugcheck.example/api/check",
        "filters": { "min_liquidity": 10000, "min_market_cap": 1000000 },
        "blacklisted_coins": ["CoinA", "CoinA", "CoinB"],
        "blacklisted_devs": [],
        "dashboard_theme": "dark"
    }"#;

    #[test]
    fn test_runtime_config_env() {
        // Single test touches these vars so parallel tests cannot race on them
        env::remove_var("TOKENWATCH_CONFIG_PATH");
        env::remove_var("TOKENWATCH_DB_PATH");

        let config = RuntimeConfig::from_env();
        assert_eq!(config.config_path, "config.json");
        assert_eq!(config.db_path, "dex_tokens.db");

        env::set_var("TOKENWATCH_CONFIG_PATH", "/tmp/tw.json");
        env::set_var("TOKENWATCH_DB_PATH", "/tmp/tw.db");

        let config = RuntimeConfig::from_env();
        assert_eq!(config.config_path, "/tmp/tw.json");
        assert_eq!(config.db_path, "/tmp/tw.db");

        env::remove_var("TOKENWATCH_CONFIG_PATH");
        env::remove_var("TOKENWATCH_DB_PATH");
    }

    #[test]
    fn test_load_applies_defaults_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = BotConfig::load(&path).unwrap();

        assert_eq!(config.telegram_chat_id, Some(ChatId::Number(987654)));
        assert_eq!(config.filters.min_liquidity, 10_000.0);
        assert_eq!(config.blacklisted_coins, vec!["CoinA", "CoinB"]);
        assert!(config.monitored_tokens.is_empty());
        assert_eq!(config.dexscreener_api_url, DEFAULT_DEXSCREENER_API_URL);
        assert_eq!(config.trade_api_url, DEFAULT_TRADE_API_URL);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.pump_price_threshold, 1000.0);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = BotConfig::load(&path).unwrap();
        config.save_atomic(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["dashboard_theme"], "dark");
        assert_eq!(raw["bonkbot_api_key"], "secret");

        // No temp files left next to the config
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_save_keeps_value_types_and_omits_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        BotConfig::load(&path).unwrap().save_atomic(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["telegram_chat_id"], serde_json::json!(987654));
        for key in [
            "dexscreener_api_url",
            "trade_api_url",
            "http_timeout_secs",
            "pump_price_threshold",
            "monitored_tokens",
        ] {
            assert!(raw.get(key).is_none(), "{} was added", key);
        }

        // Values the operator did set survive, whatever their form
        std::fs::write(
            &path,
            r#"{"telegram_chat_id": "-100123", "rugcheck_api_url": "http://x",
                "filters": {"min_liquidity": 0, "min_market_cap": 0},
                "http_timeout_secs": 30, "monitored_tokens": ["M1"]}"#,
        )
        .unwrap();
        let config = BotConfig::load(&path).unwrap();
        assert_eq!(config.telegram_chat_id.as_ref().unwrap().to_string(), "-100123");
        config.save_atomic(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["telegram_chat_id"], "-100123");
        assert_eq!(raw["http_timeout_secs"], 30);
        assert_eq!(raw["monitored_tokens"], serde_json::json!(["M1"]));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"rugcheck_api_url": "http://x", "filters": {"min_liquidity": -1, "min_market_cap": 0}}"#,
        )
        .unwrap();

        let result = BotConfig::load(&path);
        assert!(matches!(result, Err(TokenwatchError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = BotConfig::load("/nonexistent/tokenwatch/config.json");
        assert!(matches!(result, Err(TokenwatchError::Config(_))));
    }
}
