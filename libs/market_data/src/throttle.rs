//! Concurrency cap for outbound provider requests

use crate::error::{DataError, Result};
use crate::provider::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pulse_types::{BarSeries, Interval};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::trace;

/// Wraps a provider so that at most `max_concurrent` requests are in flight.
///
/// Excess callers wait for a permit; nothing is rejected or retried.
#[derive(Debug)]
pub struct ThrottledProvider<P> {
    inner: P,
    permits: Semaphore,
    max_concurrent: usize,
}

impl<P: MarketDataProvider> ThrottledProvider<P> {
    pub fn new(inner: P, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            inner,
            permits: Semaphore::new(max_concurrent),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn permit(&self) -> Result<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| DataError::Unavailable("request throttle closed".to_string()))
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for ThrottledProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BarSeries> {
        let _permit = self.permit().await?;
        trace!("Permit acquired for daily {} ({} left)", symbol, self.available_permits());
        self.inner.daily_history(symbol, from, to).await
    }

    async fn intraday_chart(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: Interval,
    ) -> Result<BarSeries> {
        let _permit = self.permit().await?;
        trace!("Permit acquired for {} {} ({} left)", interval, symbol, self.available_permits());
        self.inner.intraday_chart(symbol, from, to, interval).await
    }
}
