//! Decimal price handling.
//!
//! Prices are exact decimals end to end: parsed from the API's number text,
//! stored as text, compared without rounding. Only display rounds.

pub use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places used when a price is shown to a person.
pub const DISPLAY_DECIMALS: u32 = 4;

/// Parse a price from its textual form.
///
/// Accepts plain (`3900.12`) and scientific (`1.3e-8`) notation without
/// rounding. Negative values and text that does not fit a `Decimal` are
/// rejected.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let value = if text.contains(|c: char| c == 'e' || c == 'E') {
        Decimal::from_scientific(&text.to_ascii_lowercase()).ok()?
    } else {
        Decimal::from_str_exact(text).ok()?
    };

    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value.normalize())
}

/// Format a price with four decimal places, rounding half away from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded =
        price.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.4}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_plain_and_scientific() {
        assert_eq!(parse_price("3900.12"), Some(dec("3900.12")));
        assert_eq!(parse_price("64000"), Some(dec("64000")));
        assert_eq!(parse_price("1.3e-8"), Some(dec("0.000000013")));
        assert_eq!(parse_price("1.2E-9"), Some(dec("0.0000000012")));
    }

    #[test]
    fn test_parse_keeps_tiny_prices_distinct() {
        let quote = parse_price("1.3e-8").unwrap();
        let target = parse_price("1.4e-8").unwrap();
        assert!(quote < target);
        assert!(!parse_price("1.2e-9").unwrap().is_zero());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(parse_price("-1.0"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_parse_normalizes_scale() {
        assert_eq!(parse_price("3900.1200").unwrap().to_string(), "3900.12");
        assert_eq!(parse_price("0").unwrap().to_string(), "0");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec("3900.12")), "3900.1200");
        assert_eq!(format_price(dec("4000")), "4000.0000");
        assert_eq!(format_price(dec("0.00005")), "0.0001");
        assert_eq!(format_price(dec("0.000000013")), "0.0000");
        assert_eq!(format_price(dec("1.23456")), "1.2346");
    }
}
