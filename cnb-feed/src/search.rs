//! Currency search used by the currency picker.

use crate::rate::ExchangeRate;

/// Returns the rates whose currency name, code, or country contains `term`,
/// ignoring case. A blank term matches everything. Feed order is kept.
pub fn filter_rates<'a>(rates: &'a [ExchangeRate], term: &str) -> Vec<&'a ExchangeRate> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rates.iter().collect();
    }

    rates
        .iter()
        .filter(|rate| {
            rate.currency.to_lowercase().contains(&needle)
                || rate.code.to_lowercase().contains(&needle)
                || rate.country.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> Vec<ExchangeRate> {
        [
            ("Australia", "dollar", "AUD"),
            ("Canada", "dollar", "CAD"),
            ("EMU", "euro", "EUR"),
            ("USA", "dollar", "USD"),
        ]
        .into_iter()
        .map(|(country, currency, code)| ExchangeRate {
            country: country.into(),
            currency: currency.into(),
            amount: 1,
            code: code.into(),
            rate: 20.0,
        })
        .collect()
    }

    fn codes(found: Vec<&ExchangeRate>) -> Vec<&str> {
        found.into_iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn test_blank_term_returns_everything() {
        let rates = rates();
        assert_eq!(filter_rates(&rates, "  ").len(), 4);
    }

    #[test]
    fn test_matches_currency_name() {
        let rates = rates();
        assert_eq!(codes(filter_rates(&rates, "Dollar")), ["AUD", "CAD", "USD"]);
    }

    #[test]
    fn test_matches_code_and_country() {
        let rates = rates();
        assert_eq!(codes(filter_rates(&rates, "eur")), ["EUR"]);
        assert_eq!(codes(filter_rates(&rates, "cana")), ["CAD"]);
    }

    #[test]
    fn test_no_match() {
        let rates = rates();
        assert!(filter_rates(&rates, "peso").is_empty());
    }
}
