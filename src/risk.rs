//! Risk checks: holder concentration and third-party contract audit

use crate::config::BotConfig;
use crate::error::{Result, TokenwatchError};
use crate::market_data::PairRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Share of total supply above which a single holder marks the supply bundled
pub const BUNDLED_SUPPLY_THRESHOLD: f64 = 0.5;

/// Audit label that allows insertion
pub const AUDIT_GOOD: &str = "Good";

/// Audit label used whenever the checker cannot give an answer
pub const AUDIT_UNKNOWN: &str = "Unknown";

/// True if any single holder owns more than half of the total supply
///
/// An absent or empty holder list is not bundled. A zero (or absent,
/// or negative) total supply makes the check inconclusive, which also
/// reads as not bundled.
pub fn is_bundled(pair: &PairRecord) -> bool {
    if pair.holders.is_empty() {
        return false;
    }
    if pair.total_supply <= 0.0 {
        log::debug!(
            "Bundled check inconclusive for {}: total supply is {}",
            pair.symbol(),
            pair.total_supply
        );
        return false;
    }

    let limit = BUNDLED_SUPPLY_THRESHOLD * pair.total_supply;
    match pair.holders.iter().find(|h| h.balance > limit) {
        Some(holder) => {
            log::info!(
                "Bundled supply on {}: holder {} has {:.1}% of supply",
                pair.symbol(),
                holder.address,
                holder.balance / pair.total_supply * 100.0
            );
            true
        }
        None => false,
    }
}

/// Contract audit provider
#[async_trait]
pub trait AuditProvider: Send + Sync {
    /// Returns the provider's status label
    ///
    /// Errors on transport failure or a non-success status; callers map
    /// that to `AUDIT_UNKNOWN`.
    async fn check(&self, token_address: &str) -> Result<String>;
}

/// Extract the `status` label from an audit response body
pub fn parse_audit_status(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("status").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| AUDIT_UNKNOWN.to_string())
}

/// HTTP client for the RugCheck audit endpoint (`GET {url}?address=...`)
pub struct RugCheckClient {
    client: reqwest::Client,
    api_url: String,
}

impl RugCheckClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            config.rugcheck_api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait]
impl AuditProvider for RugCheckClient {
    async fn check(&self, token_address: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("address", token_address)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TokenwatchError::UpstreamStatus {
                service: "RugCheck",
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(parse_audit_status(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Holder;

    fn pair_with(holders: &[f64], total_supply: f64) -> PairRecord {
        PairRecord {
            holders: holders
                .iter()
                .enumerate()
                .map(|(i, balance)| Holder {
                    address: format!("holder_{}", i),
                    balance: *balance,
                })
                .collect(),
            total_supply,
            ..Default::default()
        }
    }

    #[test]
    fn test_majority_holder_is_bundled() {
        assert!(is_bundled(&pair_with(&[100.0, 600.0, 50.0], 1000.0)));
    }

    #[test]
    fn test_exactly_half_is_not_bundled() {
        assert!(!is_bundled(&pair_with(&[500.0, 500.0], 1000.0)));
    }

    #[test]
    fn test_empty_holders_not_bundled() {
        assert!(!is_bundled(&pair_with(&[], 1000.0)));
    }

    #[test]
    fn test_zero_supply_is_inconclusive() {
        assert!(!is_bundled(&pair_with(&[10.0], 0.0)));
    }

    #[test]
    fn test_parse_audit_status() {
        assert_eq!(parse_audit_status(r#"{"status": "Good"}"#), "Good");
        assert_eq!(parse_audit_status(r#"{"status": "Danger", "score": 9}"#), "Danger");
        assert_eq!(parse_audit_status(r#"{"score": 9}"#), AUDIT_UNKNOWN);
        assert_eq!(parse_audit_status(r#"{"status": 1}"#), AUDIT_UNKNOWN);
        assert_eq!(parse_audit_status("not json"), AUDIT_UNKNOWN);
    }
}
