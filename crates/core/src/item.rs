//! Tracked item configuration rows.

use crate::Decimal;
use serde::{Deserialize, Serialize};

/// One monitored asset with its target price.
///
/// Rows are created and edited outside this program. A run reads every row
/// once and writes back `last_checked_price` after a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Product name, unique key of the row
    pub identifier: String,
    /// Alert when the market price falls below this
    pub target_price: Decimal,
    /// Price seen by the most recent successful check
    pub last_checked_price: Option<Decimal>,
}

impl TrackedItem {
    /// Create an item that has never been checked.
    pub fn new(identifier: impl Into<String>, target_price: Decimal) -> Self {
        Self {
            identifier: identifier.into(),
            target_price,
            last_checked_price: None,
        }
    }

    pub fn with_last_checked_price(mut self, price: Decimal) -> Self {
        self.last_checked_price = Some(price);
        self
    }

    /// Threshold breach: the observed price is strictly below the target.
    pub fn is_breached_by(&self, price: Decimal) -> bool {
        price < self.target_price
    }
}
