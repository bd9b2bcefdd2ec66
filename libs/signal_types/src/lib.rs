//! # Pulse Types
//!
//! Vocabulary shared by every Pulse crate:
//!
//! - [`Bar`] / [`BarSeries`]: oldest-first OHLCV data handed to the indicator library
//! - [`Interval`] / [`Lookback`]: bar resolution and history window used when fetching
//! - [`Signal`], [`TrendDirection`] and the [`SignalResult`] family returned by evaluators
//! - [`Subscription`] / [`ClientId`]: the standing (symbol, strategy) requests of a client
//!
//! Everything here is plain data. Computation lives in `pulse-indicators` and
//! `pulse-strategies`; I/O lives in `pulse-market-data` and `pulse-signal-server`.

pub mod bar;
pub mod error;
pub mod interval;
pub mod signal;
pub mod subscription;

pub use bar::{Bar, BarSeries};
pub use error::ConfigurationError;
pub use interval::{Interval, Lookback};
pub use signal::{
    AdxSignal, CombinedSignal, ScoreSignal, Signal, SignalResult, TimeframeSignal, TrendDirection,
};
pub use subscription::{ClientId, Subscription};
