//! CNB Exchange-Rate Feed Library
//!
//! Turns the Czech National Bank daily fixing text feed into typed rate
//! records and converts amounts between CZK and any listed currency.
//!
//! The crate has no I/O: callers hand in the raw feed body and get back an
//! immutable [`FeedSnapshot`]. Conversion is a pure function of a snapshot,
//! a currency code, a raw amount string, and a [`Direction`].
//!
//! # Example
//! ```
//! use cnb_feed::{Direction, convert, parse};
//!
//! let feed = "25.12.2023 #249\nCountry|Currency|Amount|Code|Rate\nEMU|euro|1|EUR|24.500\n";
//! let snapshot = parse(feed).unwrap();
//!
//! let converted = convert(&snapshot, "EUR", "1000", Direction::BaseToForeign)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(converted.to_string(), "40.82 EUR");
//! ```

mod convert;
mod decimals;
mod parser;
mod rate;
mod search;

pub use convert::{Converted, ConversionError, Direction, convert};
pub use decimals::{DEFAULT_DECIMAL_PLACES, decimal_places};
pub use parser::{ParseError, SkipReason, SkippedLine, parse, parse_with_report};
pub use rate::{ExchangeRate, FeedSnapshot, format_rate};
pub use search::filter_rates;

/// The currency every feed rate is quoted in.
pub const BASE_CURRENCY: &str = "CZK";

/// Daily fixing published by the Czech National Bank.
pub const CNB_DAILY_URL: &str = "https://www.cnb.cz/en/financial-markets/foreign-exchange-market/central-bank-exchange-rate-fixing/central-bank-exchange-rate-fixing/daily.txt";
