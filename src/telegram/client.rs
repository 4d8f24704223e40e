use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::{ScanError, ScanResult};

/// Telegram Bot API client bound to one chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    parse_mode: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::build(
            &TelegramConfig::default(),
            bot_token.into(),
            chat_id.into(),
        )
    }

    /// Build from config; fails when the token or chat id is missing
    pub fn from_config(config: &TelegramConfig) -> ScanResult<Self> {
        let (token, chat) = config.credentials().ok_or_else(|| {
            ScanError::Config("Telegram bot token and chat id are required".into())
        })?;
        Ok(Self::build(config, token.to_string(), chat.to_string()))
    }

    fn build(config: &TelegramConfig, bot_token: String, chat_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
            parse_mode: config.parse_mode.clone(),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> ScanResult<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": self.parse_mode,
            "disable_web_page_preview": true
        });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ScanError::Dispatch(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScanError::Dispatch(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}

/// Dry-run notifier: writes every message to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> ScanResult<()> {
        info!("[DRY RUN] alert:\n{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_credentials() {
        let config = TelegramConfig::default();
        assert!(matches!(
            TelegramNotifier::from_config(&config),
            Err(ScanError::Config(_))
        ));

        let config = TelegramConfig {
            bot_token: Some("123:abc".into()),
            chat_id: Some("-100200".into()),
            ..TelegramConfig::default()
        };
        let notifier = TelegramNotifier::from_config(&config).unwrap();
        assert_eq!(notifier.chat_id(), "-100200");
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_is_dispatch_error() {
        let config = TelegramConfig {
            bot_token: Some("t".into()),
            chat_id: Some("c".into()),
            api_base: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..TelegramConfig::default()
        };
        let notifier = TelegramNotifier::from_config(&config).unwrap();

        let result = notifier.send("hello").await;
        assert!(matches!(result, Err(ScanError::Dispatch(_))));
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.send("*test*").await.is_ok());
    }
}
