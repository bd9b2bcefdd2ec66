//! # Pulse Market Data
//!
//! The data-fetch seam of the signal engine.
//!
//! - [`MarketDataProvider`]: daily history and intraday charts as [`BarSeries`](pulse_types::BarSeries)
//! - [`YahooChartProvider`]: HTTP client for the Yahoo Finance chart API
//! - [`ThrottledProvider`]: caps concurrent outbound requests of any provider
//! - [`testing::MockProvider`]: canned series, injected failures and call counting
//!
//! Providers never retry. A failed request surfaces as a [`DataError`] and the
//! caller decides how to degrade.

pub mod config;
pub mod error;
pub mod provider;
pub mod testing;
pub mod throttle;
pub mod yahoo;

pub use config::ProviderConfig;
pub use error::{DataError, Result};
pub use provider::MarketDataProvider;
pub use throttle::ThrottledProvider;
pub use yahoo::YahooChartProvider;
