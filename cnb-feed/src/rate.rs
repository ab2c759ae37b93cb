//! Rate records and the per-fetch snapshot.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the fixing list.
///
/// `rate` is the CZK price of `amount` units of the currency, so a row
/// `Japan|yen|100|JPY|15.5` means 100 JPY = 15.5 CZK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRate {
    #[schema(example = "EMU")]
    pub country: String,
    #[schema(example = "euro")]
    pub currency: String,
    /// Quoting unit, always positive
    #[schema(example = 1)]
    pub amount: u32,
    #[schema(example = "EUR")]
    pub code: String,
    /// CZK price of `amount` units, always positive
    #[schema(example = 24.5)]
    pub rate: f64,
}

impl ExchangeRate {
    /// CZK price of exactly one unit of the currency.
    pub fn rate_per_unit(&self) -> f64 {
        self.rate / f64::from(self.amount)
    }

    /// Units of the currency bought by one CZK.
    pub fn units_per_base(&self) -> f64 {
        let per_unit = self.rate_per_unit();
        if per_unit.is_finite() && per_unit != 0.0 {
            1.0 / per_unit
        } else {
            f64::NAN
        }
    }
}

/// Result of parsing one feed body.
///
/// Created per fetch and never merged with another snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedSnapshot {
    /// Free-text date/sequence label, e.g. `25.12.2023 #249`
    #[schema(example = "25.12.2023 #249")]
    pub date: String,
    /// Rates in feed order, never empty
    pub rates: Vec<ExchangeRate>,
}

impl FeedSnapshot {
    /// Looks up a rate by currency code.
    ///
    /// The feed does not guarantee unique codes; the last row wins.
    pub fn find(&self, code: &str) -> Option<&ExchangeRate> {
        self.rates.iter().rev().find(|r| r.code == code)
    }
}

/// Formats a table value, or an em dash when it is not a finite number.
pub fn format_rate(value: f64, digits: usize) -> String {
    if value.is_finite() {
        format!("{value:.digits$}")
    } else {
        "—".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(code: &str, amount: u32, value: f64) -> ExchangeRate {
        ExchangeRate {
            country: "Somewhere".into(),
            currency: "coin".into(),
            amount,
            code: code.into(),
            rate: value,
        }
    }

    #[test]
    fn test_rate_per_unit_divides_by_quoting_unit() {
        let jpy = rate("JPY", 100, 15.5);
        assert!((jpy.rate_per_unit() - 0.155).abs() < 1e-12);
    }

    #[test]
    fn test_units_per_base_is_reciprocal() {
        let eur = rate("EUR", 1, 25.0);
        assert!((eur.units_per_base() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_find_last_duplicate_wins() {
        let snapshot = FeedSnapshot {
            date: "x".into(),
            rates: vec![rate("EUR", 1, 24.0), rate("USD", 1, 22.0), rate("EUR", 1, 25.0)],
        };
        assert_eq!(snapshot.find("EUR").unwrap().rate, 25.0);
        assert!(snapshot.find("GBP").is_none());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.155, 4), "0.1550");
        assert_eq!(format_rate(f64::NAN, 6), "—");
        assert_eq!(format_rate(f64::INFINITY, 4), "—");
    }
}
