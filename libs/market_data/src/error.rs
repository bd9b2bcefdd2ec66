//! Error types for market data retrieval

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    /// The provider answered but had no bars for the requested window
    #[error("No data returned for {symbol}")]
    NoData { symbol: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Error object returned by the provider's API
    #[error("Provider error [{code}]: {description}")]
    Api { code: String, description: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid provider URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl DataError {
    pub fn no_data(symbol: impl Into<String>) -> Self {
        DataError::NoData {
            symbol: symbol.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// True for the "provider had nothing for this window" case
    pub fn is_no_data(&self) -> bool {
        matches!(self, DataError::NoData { .. })
    }
}
