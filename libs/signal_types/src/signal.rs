//! Signal classifications and the result shapes returned by evaluators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Five-level trade classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    #[default]
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "Strong Buy",
            Signal::Buy => "Buy",
            Signal::Hold => "Hold",
            Signal::Sell => "Sell",
            Signal::StrongSell => "Strong Sell",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Signal::Buy | Signal::StrongBuy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Signal::Sell | Signal::StrongSell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend direction reported by Supertrend.
///
/// `Neutral` marks warm-up bars and timeframes whose data could not be
/// fetched or computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Neutral,
}

impl TrendDirection {
    /// Numeric form: `+1`, `-1` or `0`
    pub fn as_i8(&self) -> i8 {
        match self {
            TrendDirection::Up => 1,
            TrendDirection::Down => -1,
            TrendDirection::Neutral => 0,
        }
    }
}

/// Output of the `combined` strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombinedSignal {
    pub momentum: Signal,
    pub breakout: Signal,
    pub volume: Signal,
    #[serde(rename = "final")]
    pub final_signal: Signal,
}

/// Per-timeframe Supertrend directions for `intraday` and `swing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeframeSignal {
    pub trend: TrendDirection,
    pub setup: TrendDirection,
    pub entry: TrendDirection,
}

/// Output of the `adx` strategy; indicator values rounded to 2 decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdxSignal {
    pub adx: Option<f64>,
    #[serde(rename = "plusDI")]
    pub plus_di: Option<f64>,
    #[serde(rename = "minusDI")]
    pub minus_di: Option<f64>,
    pub signal: Signal,
}

/// Output of the `scoresignal` composite scorer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSignal {
    pub score: i32,
    #[serde(rename = "final")]
    pub final_signal: Signal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreSignal {
    /// Neutral result carrying the reason the score could not be computed
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            score: 0,
            final_signal: Signal::Hold,
            error: Some(error.into()),
        }
    }
}

/// Any value a strategy evaluator can produce.
///
/// Serialized untagged so clients receive the bare classification string or
/// the strategy-specific object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignalResult {
    Classification(Signal),
    Combined(CombinedSignal),
    Timeframes(TimeframeSignal),
    Adx(AdxSignal),
    Score(ScoreSignal),
}

impl SignalResult {
    /// Headline classification, when the result has one
    pub fn classification(&self) -> Option<Signal> {
        match self {
            SignalResult::Classification(signal) => Some(*signal),
            SignalResult::Combined(combined) => Some(combined.final_signal),
            SignalResult::Adx(adx) => Some(adx.signal),
            SignalResult::Score(score) => Some(score.final_signal),
            SignalResult::Timeframes(_) => None,
        }
    }
}

impl From<Signal> for SignalResult {
    fn from(signal: Signal) -> Self {
        SignalResult::Classification(signal)
    }
}

impl From<CombinedSignal> for SignalResult {
    fn from(signal: CombinedSignal) -> Self {
        SignalResult::Combined(signal)
    }
}

impl From<TimeframeSignal> for SignalResult {
    fn from(signal: TimeframeSignal) -> Self {
        SignalResult::Timeframes(signal)
    }
}

impl From<AdxSignal> for SignalResult {
    fn from(signal: AdxSignal) -> Self {
        SignalResult::Adx(signal)
    }
}

impl From<ScoreSignal> for SignalResult {
    fn from(signal: ScoreSignal) -> Self {
        SignalResult::Score(signal)
    }
}
