//! # Pulse Indicators
//!
//! Pure, deterministic indicator functions over oldest-first data. No I/O and
//! no shared state: the same input always produces the same output.
//!
//! ## Output alignment
//!
//! Series-valued indicators return one element per input bar. Elements that
//! cannot be computed yet (the warm-up window) are `None`, so a value's index
//! is always the index of the bar it describes.
//!
//! | Indicator | Function | Leading `None`s |
//! |---|---|---|
//! | Average True Range | [`atr`] | `period` |
//! | Supertrend | [`supertrend`] | `atr_period` |
//! | +DI / -DI | [`adx`] | `di_period` |
//! | ADX | [`adx`] | `di_period + adx_period - 1` |
//! | RSI | [`rsi_series`] | `period` |
//! | Bollinger Bands | [`bollinger`] | `period - 1` |
//! | EMA / MACD | [`ema`], [`macd`] | none (seeded from the first value) |
//!
//! ## Degenerate inputs
//!
//! Market data is untrusted. Non-finite fields propagate as NaN instead of
//! panicking, and ratios whose denominator can reach zero (RSI, DI, DX) use a
//! fixed fallback documented on each function.

pub mod moving_average;
pub mod oscillators;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use moving_average::{ema, wilder_smoothing};
pub use oscillators::{macd, rsi, rsi_series, Macd};
pub use trend::{adx, supertrend, DirectionalIndex, Supertrend};
pub use volatility::{atr, bollinger, true_ranges, BollingerBands};
pub use volume::vwap;

/// Indicator values aligned 1:1 with the input bars
pub type IndicatorSeries = Vec<Option<f64>>;
