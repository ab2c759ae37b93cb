//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use forex_types::CNB_DAILY_URL;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Where the raw feed is fetched from
    pub feed_url: String,
    /// How long a parsed snapshot is served before refetching
    pub cache_ttl: Duration,
    pub rate_limit_per_minute: u32,
    pub upstream_timeout: Duration,
    /// OTLP collector endpoint; span export is off when unset
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_var(&lookup, "PORT", 3000)?;
        let feed_url = lookup("FEED_URL").unwrap_or_else(|| CNB_DAILY_URL.to_string());
        let cache_ttl = Duration::from_secs(parse_var(&lookup, "RATES_CACHE_TTL_SECS", 86_400)?);
        let rate_limit_per_minute = parse_var(&lookup, "RATE_LIMIT_PER_MINUTE", 100)?;
        let upstream_timeout =
            Duration::from_secs(parse_var(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?);
        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            port,
            feed_url,
            cache_ttl,
            rate_limit_per_minute,
            upstream_timeout,
            otlp_endpoint,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}")),
        None => Ok(default),
    }
}
