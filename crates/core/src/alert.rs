//! Alert events published on a threshold breach.

use crate::{format_price, Decimal};
use serde::{Deserialize, Serialize};

/// A notification ready to publish. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub subject: String,
    pub body: String,
}

impl AlertEvent {
    /// Build the alert for a price that dropped below its target.
    /// Both prices are rendered with four decimal places.
    pub fn price_drop(identifier: &str, current: Decimal, target: Decimal) -> Self {
        let subject = format!("Price Alert: {}", identifier);
        let body = format!(
            "PRICE ALERT! {} has dropped below its target price!\n\
             Current price: ${} USD\n\
             Target price: ${} USD",
            identifier,
            format_price(current),
            format_price(target)
        );
        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_price_drop_message() {
        let event = AlertEvent::price_drop("ethereum", dec("3900.12"), dec("4000.00"));

        assert_eq!(event.subject, "Price Alert: ethereum");
        assert_eq!(
            event.body,
            "PRICE ALERT! ethereum has dropped below its target price!\n\
             Current price: $3900.1200 USD\n\
             Target price: $4000.0000 USD"
        );
    }

    #[test]
    fn test_small_prices_keep_four_places() {
        let event = AlertEvent::price_drop("dogecoin", dec("0.0412"), dec("0.05"));
        assert!(event.body.contains("$0.0412 USD"));
        assert!(event.body.contains("$0.0500 USD"));
    }
}
