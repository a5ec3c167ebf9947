//! Price lookups against public market data APIs.
//!
//! - `source` - the `PriceSource` trait the checker depends on
//! - `coingecko` - REST client for the CoinGecko `simple/price` endpoint
//! - `error` - lookup failures

pub mod coingecko;
pub mod error;
pub mod source;

pub use coingecko::*;
pub use error::*;
pub use source::*;
