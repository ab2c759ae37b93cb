//! Exchange-rate feed source port.
//!
//! Implementations fetch the raw fixing text, either from the bank directly
//! or through a relay. Parsing is not their concern.

/// Why the feed body could not be obtained.
///
/// An HTTP error status and a transport failure are kept apart so the relay
/// can forward the upstream status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch exchange rates: {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        /// Leading part of the error body, if any
        body: String,
    },

    #[error("Network error: {0}")]
    Network(String),
}

/// Port trait for exchange-rate feed providers.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync + 'static {
    /// Fetches the feed body as text.
    async fn fetch_feed(&self) -> Result<String, FetchError>;

    /// Fetches the feed body exactly as the provider sent it.
    async fn fetch_raw(&self) -> Result<Vec<u8>, FetchError> {
        self.fetch_feed().await.map(String::into_bytes)
    }
}
