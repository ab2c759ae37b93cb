//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use cnb_feed::{BASE_CURRENCY, Direction, ExchangeRate, FeedSnapshot, format_rate};

// ─────────────────────────────────────────────────────────────────────────────
// Rate list DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query for the rate table and the currency picker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive filter on currency name, code, or country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(example = "dollar")]
    pub q: Option<String>,
}

/// One row of the rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateRow {
    #[schema(example = "Japan")]
    pub country: String,
    #[schema(example = "yen")]
    pub currency: String,
    #[schema(example = 100)]
    pub amount: u32,
    #[schema(example = "JPY")]
    pub code: String,
    /// CZK price of `amount` units as published
    #[schema(example = 15.5)]
    pub rate: f64,
    /// CZK per one unit, four decimals
    #[schema(example = "0.1550")]
    pub rate_per_unit: String,
    /// Units per one CZK, six decimals
    #[schema(example = "6.451613")]
    pub units_per_base: String,
}

impl From<&ExchangeRate> for RateRow {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            country: rate.country.clone(),
            currency: rate.currency.clone(),
            amount: rate.amount,
            code: rate.code.clone(),
            rate: rate.rate,
            rate_per_unit: format_rate(rate.rate_per_unit(), 4),
            units_per_base: format_rate(rate.units_per_base(), 6),
        }
    }
}

/// Response of the rate table endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    /// Feed date label as published
    #[schema(example = "25.12.2023 #249")]
    pub date: String,
    #[schema(example = "CZK")]
    pub base: String,
    pub rates: Vec<RateRow>,
}

impl RatesResponse {
    /// Builds the table from the rates that survived filtering.
    pub fn new<'a>(
        snapshot: &FeedSnapshot,
        rates: impl IntoIterator<Item = &'a ExchangeRate>,
    ) -> Self {
        Self {
            date: snapshot.date.clone(),
            base: BASE_CURRENCY.to_string(),
            rates: rates.into_iter().map(RateRow::from).collect(),
        }
    }
}

/// Entry of the currency picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyOption {
    #[schema(example = "EUR")]
    pub code: String,
    #[schema(example = "euro")]
    pub currency: String,
    #[schema(example = "EMU")]
    pub country: String,
}

impl From<&ExchangeRate> for CurrencyOption {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            code: rate.code.clone(),
            currency: rate.currency.clone(),
            country: rate.country.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Conversion request, recomputed on every input change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct ConvertQuery {
    /// Foreign currency code
    #[serde(default)]
    #[param(example = "EUR")]
    pub code: String,
    /// Amount as typed; `,` or `.` decimal separator
    #[serde(default)]
    #[param(example = "1000")]
    pub amount: String,
    #[serde(default)]
    #[param(inline)]
    pub direction: Direction,
}

/// Conversion outcome. `value` and `unit` are absent while nothing has been
/// entered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    /// Date label of the snapshot used
    #[schema(example = "25.12.2023 #249")]
    pub date: String,
    pub direction: Direction,
    /// Currency of the entered amount
    #[schema(example = "CZK")]
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "40.82")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "EUR")]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpy() -> ExchangeRate {
        ExchangeRate {
            country: "Japan".into(),
            currency: "yen".into(),
            amount: 100,
            code: "JPY".into(),
            rate: 15.5,
        }
    }

    #[test]
    fn test_rate_row_normalises_per_unit() {
        let row = RateRow::from(&jpy());
        assert_eq!(row.rate_per_unit, "0.1550");
        assert_eq!(row.units_per_base, "6.451613");
    }

    #[test]
    fn test_rates_response_carries_date_and_base() {
        let snapshot = FeedSnapshot {
            date: "25.12.2023 #249".into(),
            rates: vec![jpy()],
        };
        let response = RatesResponse::new(&snapshot, &snapshot.rates);
        assert_eq!(response.date, "25.12.2023 #249");
        assert_eq!(response.base, "CZK");
        assert_eq!(response.rates.len(), 1);
    }

    #[test]
    fn test_convert_query_defaults() {
        let query: ConvertQuery = serde_json::from_str(r#"{"code":"EUR"}"#).unwrap();
        assert_eq!(query.amount, "");
        assert_eq!(query.direction, Direction::BaseToForeign);
    }

    #[test]
    fn test_empty_convert_response_omits_value() {
        let response = ConvertResponse {
            date: "d".into(),
            direction: Direction::BaseToForeign,
            from: "CZK".into(),
            value: None,
            unit: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("value").is_none());
        assert_eq!(json["direction"], "base_to_foreign");
    }
}
