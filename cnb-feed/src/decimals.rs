//! Display precision per currency.
//!
//! Static data only; edit the tables to change how a currency is rounded.

/// Currencies without a minor unit in everyday use.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK"];

/// Currencies subdivided into 1000 minor units.
const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "JOD", "KWD", "OMR", "TND"];

pub const DEFAULT_DECIMAL_PLACES: u8 = 2;

/// Number of decimals a converted amount in `code` is shown with.
pub fn decimal_places(code: &str) -> u8 {
    if ZERO_DECIMAL_CURRENCIES.contains(&code) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&code) {
        3
    } else {
        DEFAULT_DECIMAL_PLACES
    }
}
