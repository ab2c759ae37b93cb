//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a keyed token bucket. Clients
//! whose bucket has refilled are dropped by [`RateLimiterState::prune`].

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Forgets clients whose bucket is full again.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Prunes idle clients every `every` until the handle is aborted.
    pub fn spawn_pruning(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                self.prune();
                tracing::debug!(clients = self.tracked_clients(), "Pruned rate limiter");
            }
        })
    }
}

/// Identifies the caller by the first `X-Forwarded-For` hop.
fn client_key(request: &Request<Body>) -> String {
    request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_allows_burst_then_blocks() {
        let limiter = RateLimiterState::new(2, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn test_keys_are_isolated() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn test_prune_drops_refilled_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_millis(20));
        for i in 0..1_000 {
            assert!(limiter.check(&format!("10.0.{}.{}", i / 256, i % 256)));
        }
        assert_eq!(limiter.tracked_clients(), 1_000);

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check("busy"));
        limiter.prune();

        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_prune_keeps_limited_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));

        limiter.prune();

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(!limiter.check("a"));
    }

    #[tokio::test]
    async fn test_background_pruning() {
        let limiter = Arc::new(RateLimiterState::new(1, Duration::from_millis(10)));
        assert!(limiter.check("a"));

        let task = Arc::clone(&limiter).spawn_pruning(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();

        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_client_key_uses_first_forwarded_hop() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.7");

        let anonymous = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&anonymous), "anonymous");
    }
}
