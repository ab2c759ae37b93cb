//! Conversion between CZK and a listed currency.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::BASE_CURRENCY;
use crate::decimals::decimal_places;
use crate::rate::FeedSnapshot;

/// Which way an amount is converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// CZK in, foreign currency out
    #[default]
    BaseToForeign,
    /// Foreign currency in, CZK out
    ForeignToBase,
}

impl Direction {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::BaseToForeign => Direction::ForeignToBase,
            Direction::ForeignToBase => Direction::BaseToForeign,
        }
    }

    /// Currency the entered amount is denominated in.
    pub fn input_currency(self, code: &str) -> &str {
        match self {
            Direction::BaseToForeign => BASE_CURRENCY,
            Direction::ForeignToBase => code,
        }
    }

    /// Currency the result is denominated in.
    pub fn output_currency(self, code: &str) -> &str {
        match self {
            Direction::BaseToForeign => code,
            Direction::ForeignToBase => BASE_CURRENCY,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::BaseToForeign => write!(f, "base_to_foreign"),
            Direction::ForeignToBase => write!(f, "foreign_to_base"),
        }
    }
}

/// Input validation failures. These never invalidate the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Selected currency not found")]
    CurrencyNotFound(String),

    #[error("Please enter a valid positive number")]
    InvalidAmount,

    #[error("Calculation resulted in invalid number")]
    InvalidResult,
}

impl ConversionError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::CurrencyNotFound(_) => "CURRENCY_NOT_FOUND",
            ConversionError::InvalidAmount => "INVALID_AMOUNT",
            ConversionError::InvalidResult => "INVALID_RESULT",
        }
    }
}

/// A formatted conversion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Converted {
    /// Result rounded to the output currency's decimal places
    #[schema(example = "40.82")]
    pub value: String,
    /// Output currency code
    #[schema(example = "EUR")]
    pub unit: String,
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Converts `raw_amount` using the rate for `code` in `snapshot`.
///
/// Returns `Ok(None)` while there is nothing to convert (no amount typed or
/// no currency picked yet), which is not an error.
pub fn convert(
    snapshot: &FeedSnapshot,
    code: &str,
    raw_amount: &str,
    direction: Direction,
) -> Result<Option<Converted>, ConversionError> {
    if raw_amount.is_empty() || code.is_empty() {
        return Ok(None);
    }

    let rate = snapshot
        .find(code)
        .ok_or_else(|| ConversionError::CurrencyNotFound(code.to_string()))?;

    let amount = parse_amount(raw_amount)?;
    let per_unit = rate.rate_per_unit();

    let result = match direction {
        Direction::BaseToForeign => amount / per_unit,
        Direction::ForeignToBase => amount * per_unit,
    };

    if !result.is_finite() {
        return Err(ConversionError::InvalidResult);
    }

    let unit = direction.output_currency(&rate.code);

    Ok(Some(Converted {
        value: to_fixed(result, usize::from(decimal_places(unit))),
        unit: unit.to_string(),
    }))
}

/// Fractional decimal digits needed to write any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Renders `value` with `decimals` fraction digits, rounding exact ties away
/// from zero.
///
/// Rounding looks at the exact decimal expansion of the binary value, so
/// `1.005` (stored just below the tie) stays `1.00` while `0.125` becomes
/// `0.13`.
fn to_fixed(value: f64, decimals: usize) -> String {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .collect();

    if frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        increment(&mut digits);
    }

    let split = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() && digits.iter().any(|d| *d != b'0') {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|d| char::from(*d)));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|d| char::from(*d)));
    }
    out
}

/// Adds one in the last place of an ASCII digit string.
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Accepts `,` as the decimal separator; rejects NaN, zero, and negatives.
fn parse_amount(raw: &str) -> Result<f64, ConversionError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| *amount > 0.0)
        .ok_or(ConversionError::InvalidAmount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::ExchangeRate;

    fn snapshot() -> FeedSnapshot {
        let rate = |code: &str, amount: u32, rate: f64| ExchangeRate {
            country: "Somewhere".into(),
            currency: "coin".into(),
            amount,
            code: code.into(),
            rate,
        };
        FeedSnapshot {
            date: "25.12.2023 #249".into(),
            rates: vec![
                rate("EUR", 1, 24.5),
                rate("JPY", 100, 15.5),
                rate("KWD", 1, 72.4),
            ],
        }
    }

    fn value(code: &str, amount: &str, direction: Direction) -> String {
        convert(&snapshot(), code, amount, direction)
            .unwrap()
            .unwrap()
            .value
    }

    #[test]
    fn test_base_to_foreign() {
        let converted = convert(&snapshot(), "EUR", "1000", Direction::BaseToForeign)
            .unwrap()
            .unwrap();
        assert_eq!(converted.value, "40.82");
        assert_eq!(converted.unit, "EUR");
    }

    #[test]
    fn test_zero_decimal_output() {
        assert_eq!(value("JPY", "1000", Direction::BaseToForeign), "6452");
    }

    #[test]
    fn test_three_decimal_output() {
        assert_eq!(value("KWD", "100", Direction::BaseToForeign), "1.381");
    }

    #[test]
    fn test_foreign_to_base_uses_czk_precision() {
        let converted = convert(&snapshot(), "JPY", "1000", Direction::ForeignToBase)
            .unwrap()
            .unwrap();
        assert_eq!(converted.value, "155.00");
        assert_eq!(converted.unit, "CZK");
    }

    #[test]
    fn test_comma_amount() {
        assert_eq!(value("EUR", " 2,5 ", Direction::ForeignToBase), "61.25");
    }

    #[test]
    fn test_empty_amount_is_not_an_error() {
        assert_eq!(convert(&snapshot(), "EUR", "", Direction::BaseToForeign), Ok(None));
        assert_eq!(convert(&snapshot(), "", "10", Direction::BaseToForeign), Ok(None));
    }

    #[test]
    fn test_exact_tie_rounds_up() {
        let rate = |code: &str, amount: u32, rate: f64| ExchangeRate {
            country: "Somewhere".into(),
            currency: "coin".into(),
            amount,
            code: code.into(),
            rate,
        };
        let snapshot = FeedSnapshot {
            date: "25.12.2023 #249".into(),
            rates: vec![rate("JPY", 100, 400.0), rate("EUR", 1, 8.0)],
        };
        let value = |code: &str, amount: &str| {
            convert(&snapshot, code, amount, Direction::BaseToForeign)
                .unwrap()
                .unwrap()
                .value
        };

        assert_eq!(value("JPY", "10"), "3");
        assert_eq!(value("EUR", "1"), "0.13");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(999.5, 0), "1000");
        assert_eq!(to_fixed(9.9996, 3), "10.000");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(40.816_326_530_612_24, 2), "40.82");
        assert_eq!(to_fixed(7.0, 3), "7.000");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(0.0004, 3), "0.000");
    }

    #[test]
    fn test_unknown_currency() {
        assert_eq!(
            convert(&snapshot(), "XYZ", "10", Direction::BaseToForeign),
            Err(ConversionError::CurrencyNotFound("XYZ".into()))
        );
    }

    #[test]
    fn test_invalid_amounts() {
        for raw in ["-10", "0", "abc", "NaN", "   ", "-Infinity", "12abc", "1,000.50"] {
            assert_eq!(
                convert(&snapshot(), "EUR", raw, Direction::BaseToForeign),
                Err(ConversionError::InvalidAmount),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_non_finite_result() {
        for raw in ["Infinity", "1e400"] {
            assert_eq!(
                convert(&snapshot(), "EUR", raw, Direction::BaseToForeign),
                Err(ConversionError::InvalidResult),
                "{raw:?}"
            );
        }
        assert_eq!(
            convert(&snapshot(), "JPY", "1e308", Direction::BaseToForeign),
            Err(ConversionError::InvalidResult)
        );
    }

    #[test]
    fn test_round_trip_within_rounding_tolerance() {
        let snapshot = snapshot();
        for (code, amount) in [("EUR", 1000.0), ("JPY", 1234.56), ("KWD", 99.99)] {
            let per_unit = snapshot.find(code).unwrap().rate_per_unit();
            let foreign = convert(
                &snapshot,
                code,
                &amount.to_string(),
                Direction::BaseToForeign,
            )
            .unwrap()
            .unwrap();
            let back = convert(&snapshot, code, &foreign.value, Direction::ForeignToBase)
                .unwrap()
                .unwrap();

            let foreign_step = 0.5 * 10f64.powi(-i32::from(decimal_places(code)));
            let tolerance = foreign_step * per_unit + 0.005 + 1e-9;
            let back: f64 = back.value.parse().unwrap();
            assert!(
                (back - amount).abs() <= tolerance,
                "{code}: {amount} -> {} -> {back}",
                foreign.value
            );
        }
    }

    #[test]
    fn test_direction_flip_and_currencies() {
        assert_eq!(Direction::BaseToForeign.flip(), Direction::ForeignToBase);
        assert_eq!(Direction::ForeignToBase.flip(), Direction::BaseToForeign);
        assert_eq!(Direction::BaseToForeign.input_currency("EUR"), "CZK");
        assert_eq!(Direction::ForeignToBase.output_currency("EUR"), "CZK");
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::ForeignToBase).unwrap();
        assert_eq!(json, "\"foreign_to_base\"");
        assert_eq!(Direction::default(), Direction::BaseToForeign);
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ConversionError::InvalidAmount.kind(), "INVALID_AMOUNT");
        assert_eq!(
            ConversionError::InvalidResult.to_string(),
            "Calculation resulted in invalid number"
        );
    }
}
