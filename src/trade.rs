//! Trade execution through the BonkBot HTTP API
//!
//! One POST per order with bearer authorization and body
//! `{"token_address": ..., "action": "buy" | "sell"}`. HTTP 200 is success;
//! anything else is reported and forgotten (no retry, no order tracking).

use crate::config::BotConfig;
use crate::error::{Result, TokenwatchError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct TradeRequest<'a> {
    token_address: &'a str,
    action: TradeAction,
}

#[async_trait]
pub trait TradeExecutor: Send + Sync {
    async fn execute(&self, token_address: &str, action: TradeAction) -> Result<()>;
}

pub struct BonkBotClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl BonkBotClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        if config.bonkbot_api_key.is_empty() {
            log::warn!("bonkbot_api_key is empty; trade requests will likely be rejected");
        }
        Self::new(
            config.trade_api_url.clone(),
            config.bonkbot_api_key.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait]
impl TradeExecutor for BonkBotClient {
    async fn execute(&self, token_address: &str, action: TradeAction) -> Result<()> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&TradeRequest {
                token_address,
                action,
            })
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(TokenwatchError::UpstreamStatus {
                service: "BonkBot",
                status: response.status().as_u16(),
            });
        }

        log::info!("{} executed for token {}", action, token_address);
        Ok(())
    }
}
