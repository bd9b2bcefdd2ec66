//! Composite score over VWAP, EMA crossover, RSI, MACD and Bollinger Bands
//!
//! | Component | Rule | Points |
//! |---|---|---|
//! | VWAP | close above VWAP | +1, else -1 (also when VWAP is undefined) |
//! | EMA | fast EMA above slow EMA | +1, else -1 |
//! | RSI | below oversold / above overbought | +1 / -1, else 0 |
//! | MACD | histogram positive | +2, else -2 |
//! | Bollinger | below lower / above upper band | +1 / -1, else 0 |
//!
//! A total of 4 or more is Strong Buy, 2 or more Buy, -4 or less Strong Sell,
//! -2 or less Sell, anything between Hold.

use crate::config::ScoreConfig;
use crate::error::{Result, StrategyError};
use crate::history::chart_window;
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_indicators::{bollinger, ema, macd, rsi, vwap, BollingerBands};
use pulse_market_data::MarketDataProvider;
use pulse_types::{BarSeries, ScoreSignal, Signal, SignalResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Latest indicator readings a score is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub close: f64,
    pub vwap: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: Option<f64>,
    pub macd_histogram: f64,
    pub bands: Option<BollingerBands>,
}

/// Points contributed by each component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub vwap: i32,
    pub ema: i32,
    pub rsi: i32,
    pub macd: i32,
    pub bollinger: i32,
}

impl ScoreBreakdown {
    pub fn score(inputs: &ScoreInputs, config: &ScoreConfig) -> Self {
        let close = inputs.close;

        // No VWAP (zero total volume) counts as not above it
        let vwap = match inputs.vwap {
            Some(vwap) if close > vwap => 1,
            _ => -1,
        };
        let ema = if inputs.ema_fast > inputs.ema_slow { 1 } else { -1 };
        let rsi = match inputs.rsi {
            Some(rsi) if rsi < config.rsi_oversold => 1,
            Some(rsi) if rsi > config.rsi_overbought => -1,
            _ => 0,
        };
        let macd = if inputs.macd_histogram > 0.0 { 2 } else { -2 };
        let bollinger = match inputs.bands {
            Some(bands) if close > bands.upper => -1,
            Some(bands) if close < bands.lower => 1,
            _ => 0,
        };

        Self {
            vwap,
            ema,
            rsi,
            macd,
            bollinger,
        }
    }

    pub fn total(&self) -> i32 {
        self.vwap + self.ema + self.rsi + self.macd + self.bollinger
    }
}

/// Map a total score onto the five-level scale
pub fn classify_score(score: i32) -> Signal {
    match score {
        s if s >= 4 => Signal::StrongBuy,
        s if s >= 2 => Signal::Buy,
        s if s <= -4 => Signal::StrongSell,
        s if s <= -2 => Signal::Sell,
        _ => Signal::Hold,
    }
}

pub struct ScoreStrategy {
    provider: Arc<dyn MarketDataProvider>,
    config: ScoreConfig,
}

impl ScoreStrategy {
    pub const NAME: &'static str = "scoresignal";

    pub fn new(provider: Arc<dyn MarketDataProvider>, config: ScoreConfig) -> Self {
        Self { provider, config }
    }

    /// Readings over the complete bars of `series`
    pub fn inputs(&self, series: &BarSeries) -> Result<ScoreInputs> {
        let complete = series.complete_only();
        let available = complete.len();
        let Some(last) = complete.last().copied() else {
            return Err(self.insufficient(series, available));
        };
        if available < self.config.min_bars {
            return Err(self.insufficient(series, available));
        }

        let cfg = &self.config;
        let bars = complete.bars();
        let closes = complete.closes();
        let latest = |values: Vec<f64>| values.last().copied().unwrap_or(f64::NAN);

        Ok(ScoreInputs {
            close: last.close,
            vwap: vwap(bars),
            ema_fast: latest(ema(&closes, cfg.ema_fast)),
            ema_slow: latest(ema(&closes, cfg.ema_slow)),
            rsi: rsi(&closes, cfg.rsi_period),
            macd_histogram: macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)
                .latest_histogram()
                .unwrap_or(f64::NAN),
            bands: bollinger(&closes, cfg.bollinger_period, cfg.bollinger_width)
                .last()
                .copied()
                .flatten(),
        })
    }

    fn insufficient(&self, series: &BarSeries, available: usize) -> StrategyError {
        StrategyError::InsufficientData {
            symbol: series.symbol.clone(),
            required: self.config.min_bars,
            available,
        }
    }

    async fn try_score(&self, symbol: &str) -> Result<ScoreSignal> {
        let series = chart_window(
            self.provider.as_ref(),
            symbol,
            self.config.lookback,
            self.config.interval,
        )
        .await?;

        let inputs = self.inputs(&series)?;
        let breakdown = ScoreBreakdown::score(&inputs, &self.config);
        let score = breakdown.total();

        debug!("[scoresignal] {}: {:?} -> {}", symbol, breakdown, score);

        Ok(ScoreSignal {
            score,
            final_signal: classify_score(score),
            error: None,
        })
    }

    pub async fn signal(&self, symbol: &str) -> ScoreSignal {
        match self.try_score(symbol).await {
            Ok(signal) => signal,
            Err(e) => {
                warn!("[scoresignal] {}: {}", symbol, e);
                ScoreSignal::degraded(e.to_string())
            }
        }
    }
}

#[async_trait]
impl SignalStrategy for ScoreStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ScoreInputs {
        ScoreInputs {
            close: 101.0,
            vwap: Some(100.0),
            ema_fast: 100.5,
            ema_slow: 100.0,
            rsi: Some(50.0),
            macd_histogram: -0.2,
            bands: Some(BollingerBands {
                middle: 100.0,
                upper: 103.0,
                lower: 97.0,
            }),
        }
    }

    #[test]
    fn test_mixed_readings_net_to_hold() {
        let breakdown = ScoreBreakdown::score(&inputs(), &ScoreConfig::default());

        assert_eq!(
            breakdown,
            ScoreBreakdown {
                vwap: 1,
                ema: 1,
                rsi: 0,
                macd: -2,
                bollinger: 0,
            }
        );
        assert_eq!(breakdown.total(), 0);
        assert_eq!(classify_score(breakdown.total()), Signal::Hold);
    }

    #[test]
    fn test_oversold_below_band() {
        let oversold = ScoreInputs {
            close: 96.0,
            vwap: Some(95.0),
            rsi: Some(30.0),
            macd_histogram: 0.4,
            ..inputs()
        };
        let breakdown = ScoreBreakdown::score(&oversold, &ScoreConfig::default());

        assert_eq!(breakdown.bollinger, 1);
        assert_eq!(breakdown.rsi, 1);
        assert_eq!(breakdown.total(), 6);
        assert_eq!(classify_score(breakdown.total()), Signal::StrongBuy);
    }

    #[test]
    fn test_zero_histogram_counts_against() {
        let flat = ScoreInputs {
            macd_histogram: 0.0,
            ..inputs()
        };
        assert_eq!(ScoreBreakdown::score(&flat, &ScoreConfig::default()).macd, -2);
    }

    #[test]
    fn test_undefined_vwap_counts_against() {
        let no_volume = ScoreInputs {
            vwap: None,
            ..inputs()
        };
        let breakdown = ScoreBreakdown::score(&no_volume, &ScoreConfig::default());

        assert_eq!(breakdown.vwap, -1);
        assert_eq!(breakdown.total(), -2);
        assert_eq!(classify_score(breakdown.total()), Signal::Sell);
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(classify_score(5), Signal::StrongBuy);
        assert_eq!(classify_score(4), Signal::StrongBuy);
        assert_eq!(classify_score(3), Signal::Buy);
        assert_eq!(classify_score(2), Signal::Buy);
        assert_eq!(classify_score(1), Signal::Hold);
        assert_eq!(classify_score(-1), Signal::Hold);
        assert_eq!(classify_score(-2), Signal::Sell);
        assert_eq!(classify_score(-3), Signal::Sell);
        assert_eq!(classify_score(-4), Signal::StrongSell);
    }
}
