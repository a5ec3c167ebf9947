//! Tracked item storage abstraction.

use crate::db::DbError;
use async_trait::async_trait;
use pricewatch_core::{Decimal, TrackedItem};

/// Key-value table of tracked items, keyed by identifier.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Read every tracked item, in listing order.
    async fn list_items(&self) -> Result<Vec<TrackedItem>, DbError>;

    /// Record the latest observed price for an existing item.
    /// Fails with `DbError::ItemNotFound` when no row has that identifier.
    async fn update_last_checked_price(
        &self,
        identifier: &str,
        price: Decimal,
    ) -> Result<(), DbError>;
}
