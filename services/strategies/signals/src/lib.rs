//! # Pulse Strategies
//!
//! Strategy evaluators turn a symbol into a [`SignalResult`](pulse_types::SignalResult):
//! fetch bars through a [`MarketDataProvider`](pulse_market_data::MarketDataProvider),
//! run the indicator library, classify.
//!
//! | Name | Data | Result |
//! |---|---|---|
//! | `momentum` | 10 days of daily bars | classification |
//! | `breakout` | 1 month of daily bars | classification |
//! | `volume` | 10 days of daily bars | classification |
//! | `combined` | the three above, fetched concurrently | `{momentum, breakout, volume, final}` |
//! | `intraday` | 60m / 15m / 5m over 1 day | `{trend, setup, entry}` |
//! | `swing` | 1d / 60m / 15m over 1 month | `{trend, setup, entry}` |
//! | `adx` | 60m bars over 10 days | `{adx, plusDI, minusDI, signal}` |
//! | `scoresignal` | 15m bars over 5 days | `{score, final, error?}` |
//!
//! Built-in evaluators degrade instead of failing: a fetch error or too little
//! data produces `Hold` / `neutral`, and is logged at `warn`.

pub mod adx;
pub mod combined;
pub mod config;
pub mod daily;
pub mod error;
pub mod registry;
pub mod score;
pub mod testing;
pub mod timeframes;
pub mod traits;

mod history;

pub use adx::AdxStrategy;
pub use combined::{combine, CombinedStrategy};
pub use config::StrategyConfig;
pub use daily::{BreakoutStrategy, MomentumStrategy, VolumeStrategy};
pub use error::{Result, StrategyError};
pub use registry::StrategyRegistry;
pub use score::{ScoreBreakdown, ScoreInputs, ScoreStrategy};
pub use timeframes::MultiTimeframeStrategy;
pub use traits::SignalStrategy;
