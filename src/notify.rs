//! Optional Telegram notifications for blacklist and trade events
//!
//! Delivery failures are logged and never interrupt a pipeline run.

use crate::config::BotConfig;
use crate::error::{Result, TokenwatchError};
use std::time::Duration;

/// Telegram `sendMessage` notifier
///
/// Without both a bot token and a chat id every call is a no-op.
pub struct TelegramNotifier {
    bot_token: Option<String>,
    chat_id: Option<String>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            bot_token,
            chat_id,
            client,
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            config.telegram_bot_token.clone().filter(|t| !t.is_empty()),
            config
                .telegram_chat_id
                .as_ref()
                .map(ToString::to_string)
                .filter(|id| !id.is_empty()),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// A notifier that never sends anything
    pub fn disabled() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    pub async fn send(&self, message: &str) -> Result<()> {
        let (bot_token, chat_id) = match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat)) => (token, chat),
            _ => return Ok(()),
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", bot_token);
        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", chat_id.as_str()), ("text", message)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TokenwatchError::UpstreamStatus {
                service: "Telegram",
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Send, logging instead of returning failures
    pub async fn notify(&self, message: &str) {
        if let Err(e) = self.send(message).await {
            log::warn!("Telegram notification failed: {}", e);
        }
    }
}
