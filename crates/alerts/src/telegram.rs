//! Telegram alert publisher.

use crate::config::TelegramConfig;
use crate::publisher::{AlertPublisher, PublishError};
use async_trait::async_trait;
use pricewatch_core::AlertEvent;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;

/// Publishes alerts as Telegram messages. The topic is the chat id.
pub struct TelegramPublisher {
    bot: Bot,
}

impl TelegramPublisher {
    /// Create a new publisher with the given credentials.
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot: Bot::new(&config.bot_token),
        }
    }
}

/// Parse a topic into a Telegram chat id.
fn parse_chat_id(topic: &str) -> Result<ChatId, PublishError> {
    topic
        .trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| PublishError::InvalidTopic(topic.to_string()))
}

#[async_trait]
impl AlertPublisher for TelegramPublisher {
    async fn publish(&self, topic: &str, event: &AlertEvent) -> Result<(), PublishError> {
        let chat_id = parse_chat_id(topic)?;
        let message = format_alert_message(event, chrono::Utc::now());

        self.bot
            .send_message(chat_id, message)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Format an alert event as a Telegram HTML message.
/// The subject becomes a bold heading; text is escaped.
pub fn format_alert_message(event: &AlertEvent, sent_at: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "🚨 <b>{}</b>\n\n{}\n\n⏰ {}",
        html::escape(&event.subject),
        html::escape(&event.body),
        sent_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
