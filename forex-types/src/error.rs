//! Error types for the ForexCalc service.

use cnb_feed::{ConversionError, ParseError};

use crate::ports::FetchError;

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Feed could not be fetched or parsed; no snapshot is available.
    #[error("Rates unavailable: {0}")]
    RatesUnavailable(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::RatesUnavailable(err.to_string())
    }
}

/// HTTP status and transport failures collapse into one "failed to load"
/// condition; only the relay distinguishes them.
impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::RatesUnavailable(err.to_string())
    }
}
