//! ADX / DMI trend strength signal

use crate::config::AdxConfig;
use crate::error::Result;
use crate::history::chart_window;
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_indicators::adx;
use pulse_market_data::MarketDataProvider;
use pulse_types::{AdxSignal, Signal, SignalResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Buy / Sell when the dominant DI is backed by an ADX above `threshold`
pub fn adx_decision(
    adx: Option<f64>,
    plus_di: Option<f64>,
    minus_di: Option<f64>,
    threshold: f64,
) -> Signal {
    match (adx, plus_di, minus_di) {
        (Some(adx), Some(plus), Some(minus)) if adx > threshold && plus > minus => Signal::Buy,
        (Some(adx), Some(plus), Some(minus)) if adx > threshold && minus > plus => Signal::Sell,
        _ => Signal::Hold,
    }
}

fn round2(value: Option<f64>) -> Option<f64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| (v * 100.0).round() / 100.0)
}

pub struct AdxStrategy {
    provider: Arc<dyn MarketDataProvider>,
    config: AdxConfig,
}

impl AdxStrategy {
    pub const NAME: &'static str = "adx";

    pub fn new(provider: Arc<dyn MarketDataProvider>, config: AdxConfig) -> Self {
        Self { provider, config }
    }

    pub async fn signal(&self, symbol: &str) -> AdxSignal {
        let series = match chart_window(
            self.provider.as_ref(),
            symbol,
            self.config.lookback,
            self.config.interval,
        )
        .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!("[adx] {}: falling back to Hold: {}", symbol, e);
                return AdxSignal::default();
            }
        };

        if series.len() < self.config.min_bars {
            debug!(
                "[adx] {}: {} bars, need {}; Hold",
                symbol,
                series.len(),
                self.config.min_bars
            );
            return AdxSignal::default();
        }

        let dmi = adx(series.bars(), self.config.di_period, self.config.adx_period);
        let (adx_value, plus_di, minus_di) = dmi.latest();
        let signal = adx_decision(adx_value, plus_di, minus_di, self.config.trend_threshold);

        debug!(
            "[adx] {}: adx={:?} +di={:?} -di={:?} -> {}",
            symbol, adx_value, plus_di, minus_di, signal
        );

        AdxSignal {
            adx: round2(adx_value),
            plus_di: round2(plus_di),
            minus_di: round2(minus_di),
            signal,
        }
    }
}

#[async_trait]
impl SignalStrategy for AdxStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}
