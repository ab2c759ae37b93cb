//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use forex_types::dto::{
    ConvertQuery, ConvertResponse, CurrencyOption, RateRow, RatesResponse, SearchQuery,
};
use forex_types::{Direction, ExchangeRate, FeedSnapshot};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Relay of the CNB daily fixing text
#[utoipa::path(
    get,
    path = "/api/cnb",
    tag = "relay",
    responses(
        (status = 200, description = "Feed body, unmodified", body = String, content_type = "text/plain"),
        (status = 405, description = "Any method other than GET", body = inline(serde_json::Value), example = json!({"error": "Method not allowed"})),
        (status = 500, description = "Upstream unreachable", body = inline(serde_json::Value))
    )
)]
async fn relay() {}

/// List exchange rates
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    params(SearchQuery),
    responses(
        (status = 200, description = "Rate table of the current fixing", body = RatesResponse),
        (status = 503, description = "Rates could not be loaded")
    )
)]
async fn list_rates() {}

/// List currencies for the picker
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "rates",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching currencies in feed order", body = Vec<CurrencyOption>),
        (status = 503, description = "Rates could not be loaded")
    )
)]
async fn list_currencies() {}

/// Convert an amount between CZK and a listed currency
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "convert",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Formatted result; value and unit are omitted when nothing was entered", body = ConvertResponse),
        (status = 422, description = "Invalid amount, unknown currency, or non-finite result", body = inline(serde_json::Value), example = json!({"error": "Please enter a valid positive number", "kind": "INVALID_AMOUNT", "code": 422})),
        (status = 503, description = "Rates could not be loaded")
    )
)]
async fn convert() {}

/// OpenAPI documentation for the ForexCalc API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ForexCalc API",
        version = "1.0.0",
        description = "Czech National Bank daily exchange rates and a CZK currency converter.",
        license(name = "MIT"),
    ),
    paths(health, relay, list_rates, list_currencies, convert),
    components(schemas(
        RatesResponse,
        RateRow,
        CurrencyOption,
        ConvertResponse,
        Direction,
        ExchangeRate,
        FeedSnapshot,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "relay", description = "Pass-through of the upstream feed"),
        (name = "rates", description = "Parsed exchange rates"),
        (name = "convert", description = "Currency conversion"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/cnb", "/api/rates", "/api/currencies", "/api/convert"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
