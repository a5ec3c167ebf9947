//! Alert publishing abstraction.

use async_trait::async_trait;
use pricewatch_core::AlertEvent;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
}

/// Fire-and-forget notification channel.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// Publish an alert to a topic. Delivery is not confirmed.
    async fn publish(&self, topic: &str, event: &AlertEvent) -> Result<(), PublishError>;
}

/// Publisher that only writes alerts to the log.
/// Used when no notification credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl AlertPublisher for LogPublisher {
    async fn publish(&self, topic: &str, event: &AlertEvent) -> Result<(), PublishError> {
        info!(
            topic = topic,
            subject = %event.subject,
            body = %event.body,
            "Alert (log only)"
        );
        Ok(())
    }
}
