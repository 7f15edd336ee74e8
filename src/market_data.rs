//! DexScreener API Integration
//!
//! Fetches the pair record for a token address. One GET per call, no retry.
//!
//! ## API Reference
//!
//! Endpoint: `{dexscreener_api_url}{token_address}`
//! (default `https://api.dexscreener.com/latest/dex/tokens/{address}`)
//!
//! The pair is read from `pair`; when absent, the first entry of `pairs` is
//! used. Numeric fields arrive either as JSON numbers or as numeric strings
//! (`priceUsd` is always a string). Anything unparseable reads as zero.

use crate::config::BotConfig;
use crate::error::{Result, TokenwatchError};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Source of pair records, one token address at a time
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Returns the pair record, or an error when the provider is unreachable
    /// or answers with a non-success status
    async fn fetch_pair(&self, token_address: &str) -> Result<PairRecord>;
}

/// Pair record as reported by the market data provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    #[serde(rename = "baseToken", default)]
    pub base_token: Option<BaseToken>,
    #[serde(rename = "priceUsd", default, deserialize_with = "lenient_f64")]
    pub price_usd: f64,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fdv: f64,
    #[serde(rename = "dexId", default, deserialize_with = "lenient_string")]
    pub dex_id: String,
    #[serde(default, deserialize_with = "lenient_holders")]
    pub holders: Vec<Holder>,
    #[serde(rename = "totalSupply", default, deserialize_with = "lenient_f64")]
    pub total_supply: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseToken {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Liquidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: f64,
}

impl PairRecord {
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.as_ref().map(|l| l.usd).unwrap_or(0.0)
    }

    pub fn symbol(&self) -> &str {
        self.base_token.as_ref().map(|t| t.symbol.as_str()).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.base_token.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }

    pub fn base_address(&self) -> &str {
        self.base_token.as_ref().map(|t| t.address.as_str()).unwrap_or("")
    }
}

/// Response envelope; the provider has shipped both shapes
#[derive(Debug, Deserialize)]
struct PairResponse {
    #[serde(default)]
    pair: Option<PairRecord>,
    #[serde(default)]
    pairs: Option<Vec<PairRecord>>,
}

/// Parse a provider response body into a pair record
///
/// A body without any pair yields an all-zero record, which the filter
/// rejects under any positive threshold.
pub fn parse_pair_response(body: &str) -> Result<PairRecord> {
    let response: PairResponse = serde_json::from_str(body)?;
    let pair = response
        .pair
        .or_else(|| response.pairs.and_then(|pairs| pairs.into_iter().next()))
        .unwrap_or_default();
    Ok(pair)
}

/// HTTP client for the DexScreener token endpoint
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            config.dexscreener_api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn fetch_pair(&self, token_address: &str) -> Result<PairRecord> {
        if token_address.trim().is_empty() {
            return Err(TokenwatchError::config_error("token address is empty"));
        }

        let url = format!("{}{}", self.base_url, token_address);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TokenwatchError::UpstreamStatus {
                service: "DexScreener",
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        parse_pair_response(&body)
    }
}

/// Numbers or numeric strings; everything else reads as zero
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_f64(&Value::deserialize(deserializer)?))
}

pub(crate) fn value_as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_holders<'de, D>(deserializer: D) -> std::result::Result<Vec<Holder>, D::Error>
where
    D: Deserializer<'de>,
{
    let holders = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Holder>(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(holders)
}
