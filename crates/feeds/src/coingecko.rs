//! CoinGecko REST price client.
//!
//! Looks up spot prices through the `simple/price` endpoint, one coin per
//! request. No retries: a failed lookup is reported and the caller moves on.

use crate::{lookup_key, FeedError, PriceSource};
use async_trait::async_trait;
use pricewatch_core::{parse_price, Decimal};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Connection settings for the CoinGecko API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinGeckoConfig {
    /// API root, without a trailing `/simple/price`.
    pub base_url: String,
    /// Quote currency requested via `vs_currencies`.
    pub vs_currency: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: CoinGeckoClient::BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout_secs: 10,
        }
    }
}

/// CoinGecko REST API price fetcher.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    pub const BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    /// Create a client with its own connection pool.
    pub fn new(config: CoinGeckoConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn price_url(&self) -> String {
        format!("{}/simple/price", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_price(&self, identifier: &str) -> Result<Decimal, FeedError> {
        let coin_id = lookup_key(identifier);
        let vs_currency = self.config.vs_currency.as_str();

        let response = self
            .http
            .get(self.price_url())
            .query(&[("ids", coin_id.as_str()), ("vs_currencies", vs_currency)])
            .send()
            .await
            .map_err(|e| {
                error!(coin_id = %coin_id, error = %e, "CoinGecko: request failed");
                FeedError::from(e)
            })?;

        // Only a plain 200 carries a usable quote
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!(coin_id = %coin_id, status = status.as_u16(), "CoinGecko: HTTP error");
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            error!(coin_id = %coin_id, error = %e, "CoinGecko: failed to read response");
            FeedError::from(e)
        })?;

        match parse_simple_price(&body, &coin_id, vs_currency) {
            Ok(price) => {
                debug!(coin_id = %coin_id, price = %price, "CoinGecko: price fetched");
                Ok(price)
            }
            Err(e) if e.is_not_found() => {
                warn!(coin_id = %coin_id, "CoinGecko: no price data in response");
                Err(e)
            }
            Err(e) => {
                error!(coin_id = %coin_id, error = %e, "CoinGecko: unusable response");
                Err(e)
            }
        }
    }
}

/// Extract one price from a `simple/price` response body.
///
/// The body looks like `{"ethereum":{"usd":3900.12}}`. The number is read
/// from its JSON text, so `1.3e-8` keeps every digit. A missing coin key is
/// `NotFound`; a coin entry without the requested currency, or a value that
/// is not a non-negative number, is a `ParseError`.
pub fn parse_simple_price(
    body: &str,
    coin_id: &str,
    vs_currency: &str,
) -> Result<Decimal, FeedError> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    let entry = match json.get(coin_id) {
        Some(entry) => entry,
        None => return Err(FeedError::NotFound(coin_id.to_string())),
    };

    let number = match &entry[vs_currency] {
        serde_json::Value::Number(number) => number.to_string(),
        _ => {
            return Err(FeedError::ParseError(format!(
                "No '{}' price for '{}'",
                vs_currency, coin_id
            )))
        }
    };

    parse_price(&number)
        .ok_or_else(|| FeedError::ParseError(format!("Invalid price {} for '{}'", number, coin_id)))
}
