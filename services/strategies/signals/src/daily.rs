//! Single-timeframe strategies over daily bars: momentum, breakout and volume

use crate::config::{BreakoutConfig, MomentumConfig, VolumeConfig};
use crate::error::Result;
use crate::history::daily_window;
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_market_data::MarketDataProvider;
use pulse_types::{Bar, BarSeries, Lookback, Signal, SignalResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Percent change from the oldest to the latest close against `threshold_pct`
pub fn momentum_signal(bars: &[Bar], threshold_pct: f64) -> Signal {
    let (Some(oldest), Some(latest)) = (bars.first(), bars.last()) else {
        return Signal::Hold;
    };
    if bars.len() < 2 {
        return Signal::Hold;
    }

    let change_pct = (latest.close - oldest.close) / oldest.close * 100.0;
    if change_pct > threshold_pct {
        Signal::Buy
    } else if change_pct < -threshold_pct {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Latest close against the highest high and lowest low of all prior bars
pub fn breakout_signal(bars: &[Bar]) -> Signal {
    let Some((latest, prior)) = bars.split_last() else {
        return Signal::Hold;
    };
    if prior.is_empty() {
        return Signal::Hold;
    }

    let prior_high = prior.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let prior_low = prior.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    if latest.close > prior_high {
        Signal::Buy
    } else if latest.close < prior_low {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Volume spike on the latest bar, signed by the direction of its close
pub fn volume_signal(bars: &[Bar], spike_multiplier: f64) -> Signal {
    let Some((latest, prior)) = bars.split_last() else {
        return Signal::Hold;
    };
    let Some(previous) = prior.last() else {
        return Signal::Hold;
    };

    let avg_volume = prior.iter().map(|b| b.volume).sum::<f64>() / prior.len() as f64;
    // A missing volume anywhere makes this false, never a spike
    let spike = latest.volume > avg_volume * spike_multiplier;
    if !spike {
        return Signal::Hold;
    }

    if latest.close > previous.close {
        Signal::Buy
    } else if latest.close < previous.close {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Shared shape of the daily-bar strategies: fetch a window, classify it,
/// degrade to `Hold` when the window cannot be fetched.
async fn classify_daily(
    provider: &dyn MarketDataProvider,
    strategy: &str,
    symbol: &str,
    lookback: Lookback,
    classify: impl FnOnce(&BarSeries) -> Signal,
) -> Signal {
    match daily_window(provider, symbol, lookback).await {
        Ok(series) => {
            let signal = classify(&series);
            debug!("[{}] {}: {} over {} bars", strategy, symbol, signal, series.len());
            signal
        }
        Err(e) => {
            warn!("[{}] {}: falling back to Hold: {}", strategy, symbol, e);
            Signal::Hold
        }
    }
}

pub struct MomentumStrategy {
    provider: Arc<dyn MarketDataProvider>,
    config: MomentumConfig,
}

impl MomentumStrategy {
    pub const NAME: &'static str = "momentum";

    pub fn new(provider: Arc<dyn MarketDataProvider>, config: MomentumConfig) -> Self {
        Self { provider, config }
    }

    pub async fn signal(&self, symbol: &str) -> Signal {
        let threshold = self.config.threshold_pct;
        classify_daily(
            self.provider.as_ref(),
            Self::NAME,
            symbol,
            self.config.lookback,
            |series| momentum_signal(series.bars(), threshold),
        )
        .await
    }
}

#[async_trait]
impl SignalStrategy for MomentumStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}

pub struct BreakoutStrategy {
    provider: Arc<dyn MarketDataProvider>,
    config: BreakoutConfig,
}

impl BreakoutStrategy {
    pub const NAME: &'static str = "breakout";

    pub fn new(provider: Arc<dyn MarketDataProvider>, config: BreakoutConfig) -> Self {
        Self { provider, config }
    }

    pub async fn signal(&self, symbol: &str) -> Signal {
        classify_daily(
            self.provider.as_ref(),
            Self::NAME,
            symbol,
            self.config.lookback,
            |series| breakout_signal(series.bars()),
        )
        .await
    }
}

#[async_trait]
impl SignalStrategy for BreakoutStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}

pub struct VolumeStrategy {
    provider: Arc<dyn MarketDataProvider>,
    config: VolumeConfig,
}

impl VolumeStrategy {
    pub const NAME: &'static str = "volume";

    pub fn new(provider: Arc<dyn MarketDataProvider>, config: VolumeConfig) -> Self {
        Self { provider, config }
    }

    pub async fn signal(&self, symbol: &str) -> Signal {
        let multiplier = self.config.spike_multiplier;
        classify_daily(
            self.provider.as_ref(),
            Self::NAME,
            symbol,
            self.config.lookback,
            |series| volume_signal(series.bars(), multiplier),
        )
        .await
    }
}

#[async_trait]
impl SignalStrategy for VolumeStrategy {
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
    use pulse_market_data::testing::MockProvider;
    use pulse_types::Interval;

    fn closes(values: &[f64]) -> Vec<Bar> {
        MockProvider::bars_from_closes(Interval::Day1, values)
    }

    fn with_volumes(rows: &[(f64, f64)]) -> Vec<Bar> {
        let rows: Vec<_> = rows
            .iter()
            .map(|&(close, volume)| (close, close + 1.0, close - 1.0, close, volume))
            .collect();
        MockProvider::bars_from_rows(Interval::Day1, &rows)
    }

    #[test]
    fn test_momentum_thresholds() {
        assert_eq!(momentum_signal(&closes(&[100.0, 101.0, 103.5]), 3.0), Signal::Buy);
        assert_eq!(momentum_signal(&closes(&[100.0, 99.0, 96.0]), 3.0), Signal::Sell);
        assert_eq!(momentum_signal(&closes(&[100.0, 102.0]), 3.0), Signal::Hold);
        assert_eq!(momentum_signal(&closes(&[100.0]), 3.0), Signal::Hold);
        assert_eq!(momentum_signal(&[], 3.0), Signal::Hold);
    }

    #[test]
    fn test_breakout_against_prior_range() {
        // Prior highs top out at 106 (close 105 + 1)
        assert_eq!(breakout_signal(&closes(&[100.0, 105.0, 102.0, 107.0])), Signal::Buy);
        assert_eq!(breakout_signal(&closes(&[100.0, 105.0, 102.0, 98.0])), Signal::Sell);
        assert_eq!(breakout_signal(&closes(&[100.0, 105.0, 102.0, 106.0])), Signal::Hold);
        assert_eq!(breakout_signal(&closes(&[100.0])), Signal::Hold);
    }

    #[test]
    fn test_volume_spike_direction() {
        let up = with_volumes(&[(100.0, 1_000.0), (101.0, 1_000.0), (102.0, 2_500.0)]);
        let down = with_volumes(&[(100.0, 1_000.0), (101.0, 1_000.0), (99.0, 2_500.0)]);
        let flat = with_volumes(&[(100.0, 1_000.0), (101.0, 1_000.0), (101.0, 2_500.0)]);
        let quiet = with_volumes(&[(100.0, 1_000.0), (101.0, 1_000.0), (102.0, 2_000.0)]);

        assert_eq!(volume_signal(&up, 2.0), Signal::Buy);
        assert_eq!(volume_signal(&down, 2.0), Signal::Sell);
        assert_eq!(volume_signal(&flat, 2.0), Signal::Hold);
        assert_eq!(volume_signal(&quiet, 2.0), Signal::Hold);
        assert_eq!(volume_signal(&up[..1], 2.0), Signal::Hold);
    }

    #[test]
    fn test_missing_volume_is_never_a_spike() {
        let prior_gap = with_volumes(&[(100.0, 1_000.0), (101.0, f64::NAN), (102.0, 1_100.0)]);
        let latest_gap = with_volumes(&[(100.0, 1_000.0), (101.0, 1_000.0), (102.0, f64::NAN)]);

        assert_eq!(volume_signal(&prior_gap, 2.0), Signal::Hold);
        assert_eq!(volume_signal(&latest_gap, 2.0), Signal::Hold);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_hold() {
        let provider = Arc::new(MockProvider::new().with_failure("AAPL", "timeout"));
        let strategy = MomentumStrategy::new(provider, MomentumConfig::default());

        let result = strategy.evaluate("AAPL").await.unwrap();
        assert_eq!(result, SignalResult::Classification(Signal::Hold));
    }

    #[tokio::test]
    async fn test_reads_daily_bars() {
        let provider = Arc::new(
            MockProvider::new().with_series("AAPL", Interval::Day1, closes(&[100.0, 110.0])),
        );
        let strategy = MomentumStrategy::new(provider.clone(), MomentumConfig::default());

        assert_eq!(strategy.signal("AAPL").await, Signal::Buy);
        assert_eq!(provider.requests(), vec![("AAPL".to_string(), Interval::Day1)]);
    }
}
