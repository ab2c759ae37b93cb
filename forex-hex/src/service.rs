//! Rate Application Service
//!
//! Fetches the feed through the `FeedSource` port, keeps the parsed snapshot
//! for a configurable time, and runs conversions against it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use forex_types::{
    AppError, ConvertQuery, ConvertResponse, Converted, CurrencyOption, FeedSnapshot, FeedSource,
    FetchError, RatesResponse,
};

/// How long a parsed snapshot is served before the feed is fetched again.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CachedSnapshot {
    snapshot: Arc<FeedSnapshot>,
    fetched_at: Instant,
}

/// Application service for exchange-rate operations.
///
/// Generic over `S: FeedSource` - the adapter is injected at compile time.
pub struct RateService<S: FeedSource> {
    source: S,
    ttl: Duration,
    cache: RwLock<Option<CachedSnapshot>>,
    /// Held while fetching so concurrent misses share one upstream request
    refresh: Mutex<()>,
}

impl<S: FeedSource> RateService<S> {
    /// Creates a new rate service with the default cache lifetime.
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_CACHE_TTL)
    }

    /// Creates a new rate service with a custom cache lifetime.
    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying feed source.
    pub fn source(&self) -> &S {
        &self.source
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Feed
    // ─────────────────────────────────────────────────────────────────────────────

    /// Fetches the feed body byte for byte, without parsing or caching it.
    pub async fn raw_feed(&self) -> Result<Vec<u8>, FetchError> {
        self.source.fetch_raw().await
    }

    /// Returns the current snapshot, fetching and parsing the feed when the
    /// cached one is missing or stale.
    ///
    /// A failed refresh leaves the cache untouched.
    pub async fn snapshot(&self) -> Result<Arc<FeedSnapshot>, AppError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let _guard = self.refresh.lock().await;

        // Another request may have refreshed while we waited
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let text = self.source.fetch_feed().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch exchange rates");
            AppError::from(e)
        })?;

        let (snapshot, skipped) = cnb_feed::parse_with_report(&text).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse exchange rates");
            AppError::from(e)
        })?;

        tracing::info!(
            date = %snapshot.date,
            rates = snapshot.rates.len(),
            skipped = skipped.len(),
            "Loaded exchange rates"
        );

        let snapshot = Arc::new(snapshot);
        *self.cache.write().await = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            fetched_at: Instant::now(),
        });

        Ok(snapshot)
    }

    async fn fresh_snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.cache
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.snapshot))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists rates, optionally filtered by a search term.
    pub async fn list_rates(&self, search: Option<&str>) -> Result<RatesResponse, AppError> {
        let snapshot = self.snapshot().await?;
        let rates = cnb_feed::filter_rates(&snapshot.rates, search.unwrap_or_default());
        Ok(RatesResponse::new(&snapshot, rates))
    }

    /// Lists the currencies offered by the currency picker.
    pub async fn currencies(&self, search: Option<&str>) -> Result<Vec<CurrencyOption>, AppError> {
        let snapshot = self.snapshot().await?;
        Ok(cnb_feed::filter_rates(&snapshot.rates, search.unwrap_or_default())
            .into_iter()
            .map(CurrencyOption::from)
            .collect())
    }

    /// Converts an amount with the current snapshot.
    pub async fn convert(&self, query: &ConvertQuery) -> Result<ConvertResponse, AppError> {
        let snapshot = self.snapshot().await?;

        let converted =
            cnb_feed::convert(&snapshot, &query.code, &query.amount, query.direction)?;

        let (value, unit) = match converted {
            Some(Converted { value, unit }) => (Some(value), Some(unit)),
            None => (None, None),
        };

        Ok(ConvertResponse {
            date: snapshot.date.clone(),
            direction: query.direction,
            from: query.direction.input_currency(&query.code).to_string(),
            value,
            unit,
        })
    }
}
