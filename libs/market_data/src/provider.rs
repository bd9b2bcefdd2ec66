//! The data-fetch interface consumed by strategy evaluators

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pulse_types::{BarSeries, Interval};
use std::sync::Arc;

/// Source of historical and intraday bars.
///
/// Implementations return series ordered oldest-first (guaranteed by
/// [`BarSeries::new`]) and report an empty window as
/// [`DataError::NoData`](crate::DataError::NoData).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Daily bars with dates in `from..=to`
    async fn daily_history(&self, symbol: &str, from: NaiveDate, to: NaiveDate)
        -> Result<BarSeries>;

    /// Bars of `interval` resolution between `from` and `to`
    async fn intraday_chart(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: Interval,
    ) -> Result<BarSeries>;
}

#[async_trait]
impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BarSeries> {
        (**self).daily_history(symbol, from, to).await
    }

    async fn intraday_chart(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: Interval,
    ) -> Result<BarSeries> {
        (**self).intraday_chart(symbol, from, to, interval).await
    }
}
