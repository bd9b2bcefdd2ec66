//! Strategy configuration

use pulse_types::{ConfigurationError, Interval, Lookback};
use serde::{Deserialize, Serialize};

/// Periods, thresholds and lookbacks for every built-in strategy.
///
/// Deserialized from the `[strategies]` table; every field has a default, and
/// lookback / interval strings are parsed while deserializing so a bad value
/// fails at load time rather than on the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub momentum: MomentumConfig,
    pub breakout: BreakoutConfig,
    pub volume: VolumeConfig,
    pub supertrend: SupertrendConfig,
    pub intraday: TimeframeProfile,
    pub swing: TimeframeProfile,
    pub adx: AdxConfig,
    pub score: ScoreConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            momentum: MomentumConfig::default(),
            breakout: BreakoutConfig::default(),
            volume: VolumeConfig::default(),
            supertrend: SupertrendConfig::default(),
            intraday: TimeframeProfile::intraday(),
            swing: TimeframeProfile::swing(),
            adx: AdxConfig::default(),
            score: ScoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub lookback: Lookback,
    /// Percent move from the oldest to the latest close that counts as momentum
    pub threshold_pct: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: Lookback::Days(10),
            threshold_pct: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub lookback: Lookback,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            lookback: Lookback::Months(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub lookback: Lookback,
    /// Latest volume must exceed this multiple of the prior average
    pub spike_multiplier: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            lookback: Lookback::Days(10),
            spike_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendConfig {
    pub atr_period: usize,
    pub factor: f64,
}

impl Default for SupertrendConfig {
    fn default() -> Self {
        Self {
            atr_period: 10,
            factor: 3.0,
        }
    }
}

/// Lookback and the three bar intervals of a multi-timeframe strategy.
///
/// A profile table must name all four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeProfile {
    pub lookback: Lookback,
    pub trend: Interval,
    pub setup: Interval,
    pub entry: Interval,
}

impl TimeframeProfile {
    pub fn intraday() -> Self {
        Self {
            lookback: Lookback::Days(1),
            trend: Interval::Hour1,
            setup: Interval::Min15,
            entry: Interval::Min5,
        }
    }

    pub fn swing() -> Self {
        Self {
            lookback: Lookback::Months(1),
            trend: Interval::Day1,
            setup: Interval::Hour1,
            entry: Interval::Min15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxConfig {
    pub lookback: Lookback,
    pub interval: Interval,
    pub di_period: usize,
    pub adx_period: usize,
    /// Fewer bars than this yields `Hold` with null indicator values
    pub min_bars: usize,
    /// ADX level above which a DI crossover is a trend
    pub trend_threshold: f64,
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self {
            lookback: Lookback::Days(10),
            interval: Interval::Hour1,
            di_period: 14,
            adx_period: 14,
            min_bars: 15,
            trend_threshold: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub lookback: Lookback,
    pub interval: Interval,
    pub min_bars: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_width: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            lookback: Lookback::Days(5),
            interval: Interval::Min15,
            min_bars: 30,
            ema_fast: 9,
            ema_slow: 21,
            rsi_period: 14,
            rsi_oversold: 45.0,
            rsi_overbought: 65.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_width: 2.0,
        }
    }
}

impl StrategyConfig {
    /// Reject values the indicator math cannot use
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let periods = [
            ("supertrend.atr_period", self.supertrend.atr_period),
            ("adx.di_period", self.adx.di_period),
            ("adx.adx_period", self.adx.adx_period),
            ("score.ema_fast", self.score.ema_fast),
            ("score.ema_slow", self.score.ema_slow),
            ("score.rsi_period", self.score.rsi_period),
            ("score.macd_fast", self.score.macd_fast),
            ("score.macd_slow", self.score.macd_slow),
            ("score.macd_signal", self.score.macd_signal),
            ("score.bollinger_period", self.score.bollinger_period),
        ];
        if let Some((field, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(ConfigurationError::invalid(*field, "period must be at least 1"));
        }

        let positive = [
            ("momentum.threshold_pct", self.momentum.threshold_pct),
            ("volume.spike_multiplier", self.volume.spike_multiplier),
            ("supertrend.factor", self.supertrend.factor),
            ("score.bollinger_width", self.score.bollinger_width),
        ];
        if let Some((field, _)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(ConfigurationError::invalid(*field, "must be a positive number"));
        }

        if self.score.rsi_oversold >= self.score.rsi_overbought {
            return Err(ConfigurationError::invalid(
                "score.rsi_oversold",
                "must be below score.rsi_overbought",
            ));
        }

        Ok(())
    }
}
