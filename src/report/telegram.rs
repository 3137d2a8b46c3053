//! Telegram Bot API delivery.
//!
//! Posts the rendered briefing to a chat via `sendMessage`.
//!
//! API docs: https://core.telegram.org/bots/api#sendmessage
//! Auth: bot token in the URL path, no headers required.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use crate::types::PulseError;

/// Telegram Bot API client for one bot + chat pair.
pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("PULSE/0.1.0 (crypto-analysis-agent)")
            .build()
            .context("Failed to build HTTP client for Telegram")?;

        Ok(Self { http, bot_token, chat_id })
    }

    /// Send a plain-text message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PulseError::Notify(format!("sendMessage failed {status}: {body}")).into());
        }

        info!(chat_id = %self.chat_id, chars = text.chars().count(), "Briefing posted to Telegram");
        Ok(())
    }
}
