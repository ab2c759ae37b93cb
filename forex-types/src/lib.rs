//! # Forex Types
//!
//! DTOs and port traits for the ForexCalc service. Like the feed library
//! it builds on, this crate performs no IO.
//!
//! ## Architecture
//!
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Application error types

pub mod dto;
pub mod error;
pub mod ports;

// Re-export the feed domain so adapters need a single dependency
pub use cnb_feed::{
    BASE_CURRENCY, CNB_DAILY_URL, ConversionError, Converted, Direction, ExchangeRate,
    FeedSnapshot, ParseError,
};
pub use dto::*;
pub use error::AppError;
pub use ports::{FeedSource, FetchError};
