//! Price source abstraction.

use crate::FeedError;
use async_trait::async_trait;
use pricewatch_core::Decimal;

/// Trait for anything that can quote a current price for an identifier.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Look up the current price. Any error means "no quote" for this run.
    async fn fetch_price(&self, identifier: &str) -> Result<Decimal, FeedError>;
}

/// Map a product name to the lookup key used by price services.
/// Lookup keys are case-insensitive: `Ethereum` and `ethereum` match.
pub fn lookup_key(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
