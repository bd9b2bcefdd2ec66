//! Multi-timeframe Supertrend: `intraday` and `swing`

use crate::config::{SupertrendConfig, TimeframeProfile};
use crate::error::{Result, StrategyError};
use crate::history::chart_window;
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_indicators::supertrend;
use pulse_market_data::MarketDataProvider;
use pulse_types::{Interval, SignalResult, TimeframeSignal, TrendDirection};
use std::sync::Arc;
use tracing::{debug, warn};

/// Supertrend direction on the trend, setup and entry timeframes.
///
/// Each timeframe is fetched and computed independently, so one failing
/// fetch only turns its own label `neutral`.
pub struct MultiTimeframeStrategy {
    name: &'static str,
    provider: Arc<dyn MarketDataProvider>,
    profile: TimeframeProfile,
    supertrend: SupertrendConfig,
}

impl MultiTimeframeStrategy {
    pub const INTRADAY: &'static str = "intraday";
    pub const SWING: &'static str = "swing";

    pub fn new(
        name: &'static str,
        provider: Arc<dyn MarketDataProvider>,
        profile: TimeframeProfile,
        supertrend: SupertrendConfig,
    ) -> Self {
        Self {
            name,
            provider,
            profile,
            supertrend,
        }
    }

    pub fn intraday(
        provider: Arc<dyn MarketDataProvider>,
        profile: TimeframeProfile,
        supertrend: SupertrendConfig,
    ) -> Self {
        Self::new(Self::INTRADAY, provider, profile, supertrend)
    }

    pub fn swing(
        provider: Arc<dyn MarketDataProvider>,
        profile: TimeframeProfile,
        supertrend: SupertrendConfig,
    ) -> Self {
        Self::new(Self::SWING, provider, profile, supertrend)
    }

    pub fn profile(&self) -> &TimeframeProfile {
        &self.profile
    }

    pub async fn signal(&self, symbol: &str) -> TimeframeSignal {
        let labels = [
            ("trend", self.profile.trend),
            ("setup", self.profile.setup),
            ("entry", self.profile.entry),
        ];

        let directions = futures::future::join_all(
            labels
                .iter()
                .map(|&(label, interval)| self.label_direction(symbol, label, interval)),
        )
        .await;

        let signal = TimeframeSignal {
            trend: directions[0],
            setup: directions[1],
            entry: directions[2],
        };
        debug!("[{}] {}: {:?}", self.name, symbol, signal);
        signal
    }

    async fn label_direction(&self, symbol: &str, label: &str, interval: Interval) -> TrendDirection {
        match self.direction(symbol, interval).await {
            Ok(direction) => direction,
            Err(e) => {
                warn!("[{}] {} {} ({}): neutral: {}", self.name, symbol, label, interval, e);
                TrendDirection::Neutral
            }
        }
    }

    /// Final-bar Supertrend direction; anything but `Up` reports as `Down`
    async fn direction(&self, symbol: &str, interval: Interval) -> Result<TrendDirection> {
        let series =
            chart_window(self.provider.as_ref(), symbol, self.profile.lookback, interval).await?;
        if series.len() < 2 {
            return Err(StrategyError::InsufficientData {
                symbol: symbol.to_string(),
                required: 2,
                available: series.len(),
            });
        }

        let trend = supertrend(series.bars(), self.supertrend.atr_period, self.supertrend.factor);
        Ok(match trend.last_direction() {
            TrendDirection::Up => TrendDirection::Up,
            _ => TrendDirection::Down,
        })
    }
}

#[async_trait]
impl SignalStrategy for MultiTimeframeStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}
