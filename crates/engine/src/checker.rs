//! Price check orchestrator.

use crate::{AlertStatus, ItemOutcome, RunReport, RunStatus};
use pricewatch_alerts::{AlertPublisher, DbError, ItemStore};
use pricewatch_core::{AlertEvent, Decimal, TrackedItem};
use pricewatch_feeds::PriceSource;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Failed to list tracked items: {0}")]
    StorageRead(#[source] DbError),
}

/// Configuration for the checker.
#[derive(Debug, Clone, Default)]
pub struct CheckerConfig {
    /// Notification topic alerts are published to.
    pub topic: String,
}

impl CheckerConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

/// Runs one price check over every tracked item.
pub struct PriceChecker {
    store: Arc<dyn ItemStore>,
    source: Arc<dyn PriceSource>,
    publisher: Arc<dyn AlertPublisher>,
    config: CheckerConfig,
}

impl PriceChecker {
    /// Create a new checker from its service handles.
    pub fn new(
        store: Arc<dyn ItemStore>,
        source: Arc<dyn PriceSource>,
        publisher: Arc<dyn AlertPublisher>,
        config: CheckerConfig,
    ) -> Self {
        Self {
            store,
            source,
            publisher,
            config,
        }
    }

    /// Run a check and reduce it to the status reported to the invoker.
    pub async fn invoke(&self) -> RunStatus {
        match self.run().await {
            Ok(_) => RunStatus::complete(),
            Err(CheckError::StorageRead(_)) => RunStatus::database_error(),
        }
    }

    /// List all items, then fetch, evaluate and persist each in listing order.
    ///
    /// Only a listing failure is returned as an error. Every later failure
    /// is recorded in that item's outcome.
    pub async fn run(&self) -> Result<RunReport, CheckError> {
        info!("Starting price check");

        let items = self.store.list_items().await.map_err(|e| {
            error!(error = %e, "Failed to list tracked items");
            CheckError::StorageRead(e)
        })?;
        info!(items = items.len(), "Loaded tracked items");

        let mut report = RunReport::with_capacity(items.len());
        for item in &items {
            let outcome = self.check_item(item).await;
            report.push(item.identifier.clone(), outcome);
        }

        info!(
            checked = report.checked_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            alerts = report.alerts_published(),
            "Price check complete"
        );
        Ok(report)
    }

    /// Fetch, evaluate and persist a single item.
    pub async fn check_item(&self, item: &TrackedItem) -> ItemOutcome {
        let price = match self.source.fetch_price(&item.identifier).await {
            Ok(price) => price,
            Err(e) => {
                debug!(identifier = %item.identifier, reason = %e, "Skipping item: no price");
                return ItemOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        info!(
            identifier = %item.identifier,
            current = %price,
            target = %item.target_price,
            "Price checked"
        );

        let alert = self.evaluate(item, price).await;

        match self.persist(item, price).await {
            Ok(()) => ItemOutcome::Checked { price, alert },
            Err(e) => ItemOutcome::Failed {
                price,
                alert,
                error: e.to_string(),
            },
        }
    }

    /// Publish an alert when the price is below the item's target.
    /// A publish failure is logged and returned, never propagated.
    pub async fn evaluate(&self, item: &TrackedItem, price: Decimal) -> AlertStatus {
        if !item.is_breached_by(price) {
            return AlertStatus::NotTriggered;
        }

        let event = AlertEvent::price_drop(&item.identifier, price, item.target_price);
        match self.publisher.publish(&self.config.topic, &event).await {
            Ok(()) => {
                info!(identifier = %item.identifier, topic = %self.config.topic, "Alert published");
                AlertStatus::Published
            }
            Err(e) => {
                error!(
                    identifier = %item.identifier,
                    topic = %self.config.topic,
                    error = %e,
                    "Failed to publish alert"
                );
                AlertStatus::PublishFailed(e.to_string())
            }
        }
    }

    /// Store the observed price as the item's last checked price.
    pub async fn persist(&self, item: &TrackedItem, price: Decimal) -> Result<(), DbError> {
        self.store
            .update_last_checked_price(&item.identifier, price)
            .await
            .map_err(|e| {
                error!(identifier = %item.identifier, error = %e, "Failed to store price");
                e
            })
    }
}
