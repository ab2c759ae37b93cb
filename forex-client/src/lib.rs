//! # Forex Client
//!
//! reqwest adapter implementing the `FeedSource` port. Points at the bank's
//! daily fixing URL or at a relay that passes the same text through.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use forex_types::{CNB_DAILY_URL, FeedSource, FetchError};

/// Identifies the service to the feed provider.
pub const USER_AGENT: &str = "ForexCalc/1.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_BODY_PREVIEW_CHARS: usize = 100;

/// Error type for building a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Feed client.
pub struct FeedClient {
    url: String,
    http: Client,
}

impl FeedClient {
    /// Creates a client fetching from `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for the bank's daily fixing.
    pub fn cnb() -> Result<Self, ClientError> {
        Self::new(CNB_DAILY_URL)
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// URL the feed is fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self) -> Result<reqwest::Response, FetchError> {
        let resp = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Feed request could not be sent");
            FetchError::Network(e.to_string())
        })?;
        self.handle_response(resp).await
    }

    async fn handle_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, FetchError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), url = %self.url, "Feed request failed");
        Err(FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
        })
    }
}

fn body_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

#[async_trait]
impl FeedSource for FeedClient {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_feed(&self) -> Result<String, FetchError> {
        self.send().await?.text().await.map_err(body_error)
    }

    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_raw(&self) -> Result<Vec<u8>, FetchError> {
        let body = self.send().await?.bytes().await.map_err(body_error)?;
        Ok(body.to_vec())
    }
}
