//! Provider connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// `[provider]` table of the server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Chart endpoint; the symbol is appended as a path segment
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Upper bound on in-flight requests across all evaluations
    pub max_concurrent_requests: usize,
    pub user_agent: String,
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_YAHOO_CHART_URL.to_string(),
            request_timeout_secs: 15,
            max_concurrent_requests: 8,
            user_agent: concat!("pulse-signal-server/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
