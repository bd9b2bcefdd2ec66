//! Lookback windows ending now

use chrono::Utc;
use pulse_market_data::{MarketDataProvider, Result};
use pulse_types::{BarSeries, Interval, Lookback};

pub(crate) async fn daily_window(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    lookback: Lookback,
) -> Result<BarSeries> {
    let now = Utc::now();
    provider
        .daily_history(symbol, lookback.start_from(now).date_naive(), now.date_naive())
        .await
}

pub(crate) async fn chart_window(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    lookback: Lookback,
    interval: Interval,
) -> Result<BarSeries> {
    let now = Utc::now();
    provider
        .intraday_chart(symbol, lookback.start_from(now), now, interval)
        .await
}
