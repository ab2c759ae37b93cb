//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use forex_types::{AppError, ConvertQuery, FeedSource, FetchError, SearchQuery};

use crate::RateService;

/// Caching directive sent with relayed feed bodies.
pub const RELAY_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

/// Application state shared across handlers.
pub struct AppState<S: FeedSource> {
    pub service: RateService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match &self.0 {
            AppError::RatesUnavailable(msg) => {
                tracing::warn!(reason = %msg, "Serving rates-unavailable response");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Failed to load exchange rates".to_string(),
                    None,
                )
            }
            AppError::Conversion(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                Some(err.kind()),
            ),
        };

        let mut body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });
        if let Some(kind) = kind {
            body["kind"] = kind.into();
        }

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Relays the upstream feed body unmodified.
#[tracing::instrument(skip(state))]
pub async fn relay<S: FeedSource>(State(state): State<Arc<AppState<S>>>) -> Response {
    match state.service.raw_feed().await {
        Ok(body) => (
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
                (header::CACHE_CONTROL, RELAY_CACHE_CONTROL),
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            ],
            body,
        )
            .into_response(),
        Err(FetchError::Status { status, reason, .. }) => {
            tracing::error!(status, %reason, "CNB API error");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(serde_json::json!({
                    "error": format!("Failed to fetch from CNB: {reason}")
                })),
            )
                .into_response()
        }
        Err(FetchError::Network(message)) => {
            tracing::error!(%message, "Error fetching CNB data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "message": message
                })),
            )
                .into_response()
        }
    }
}

/// Answers every non-GET request to the relay.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

/// List rates, optionally filtered.
#[tracing::instrument(skip(state))]
pub async fn list_rates<S: FeedSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.service.list_rates(query.q.as_deref()).await?;
    Ok(Json(rates))
}

/// List currencies for the picker.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<S: FeedSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let currencies = state.service.currencies(query.q.as_deref()).await?;
    Ok(Json(currencies))
}

/// Convert an amount.
#[tracing::instrument(skip(state), fields(code = %query.code, direction = %query.direction))]
pub async fn convert<S: FeedSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.convert(&query).await?;
    Ok(Json(response))
}
