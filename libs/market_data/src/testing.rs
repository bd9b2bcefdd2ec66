//! Test doubles for code that consumes a [`MarketDataProvider`]

use crate::error::{DataError, Result};
use crate::provider::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::{Mutex, RwLock};
use pulse_types::{Bar, BarSeries, Interval};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory provider with canned series.
///
/// The requested window is ignored: every call for a `(symbol, interval)`
/// returns the full canned series. Unknown pairs return
/// [`DataError::NoData`].
#[derive(Debug, Default)]
pub struct MockProvider {
    series: RwLock<HashMap<(String, Interval), Vec<Bar>>>,
    failures: RwLock<HashMap<String, String>>,
    interval_failures: RwLock<HashMap<(String, Interval), String>>,
    delays: RwLock<HashMap<String, Duration>>,
    requests: Mutex<Vec<(String, Interval)>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, symbol: &str, interval: Interval, bars: Vec<Bar>) -> Self {
        self.set_series(symbol, interval, bars);
        self
    }

    /// Every request for `symbol` fails with `message`
    pub fn with_failure(self, symbol: &str, message: &str) -> Self {
        self.fail_symbol(symbol, message);
        self
    }

    /// Only requests for `symbol` at `interval` fail
    pub fn with_interval_failure(self, symbol: &str, interval: Interval, message: &str) -> Self {
        self.interval_failures
            .write()
            .insert((symbol.to_string(), interval), message.to_string());
        self
    }

    /// Every request for `symbol` sleeps for `delay` before answering
    pub fn with_delay(self, symbol: &str, delay: Duration) -> Self {
        self.delays.write().insert(symbol.to_string(), delay);
        self
    }

    pub fn set_series(&self, symbol: &str, interval: Interval, bars: Vec<Bar>) {
        self.series
            .write()
            .insert((symbol.to_string(), interval), bars);
    }

    pub fn fail_symbol(&self, symbol: &str, message: &str) {
        self.failures
            .write()
            .insert(symbol.to_string(), message.to_string());
    }

    pub fn recover_symbol(&self, symbol: &str) {
        self.failures.write().remove(symbol);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Every `(symbol, interval)` requested so far, in call order
    pub fn requests(&self) -> Vec<(String, Interval)> {
        self.requests.lock().clone()
    }

    /// Bars built from `(open, high, low, close, volume)` rows, spaced one
    /// `interval` apart starting 2024-01-02 14:30 UTC
    pub fn bars_from_rows(interval: Interval, rows: &[(f64, f64, f64, f64, f64)]) -> Vec<Bar> {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 2, 14, 30, 0)
            .single()
            .unwrap_or_default();

        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close, volume))| {
                let timestamp = start + interval.duration() * i as i32;
                Bar::new(timestamp, open, high, low, close, volume)
            })
            .collect()
    }

    /// Bars with the given closes, a range of one either side and constant volume
    pub fn bars_from_closes(interval: Interval, closes: &[f64]) -> Vec<Bar> {
        let rows: Vec<_> = closes
            .iter()
            .map(|&c| (c, c + 1.0, c - 1.0, c, 1_000.0))
            .collect();
        Self::bars_from_rows(interval, &rows)
    }

    pub fn flat_bars(interval: Interval, count: usize, price: f64) -> Vec<Bar> {
        Self::bars_from_closes(interval, &vec![price; count])
    }

    async fn fetch(&self, symbol: &str, interval: Interval) -> Result<BarSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push((symbol.to_string(), interval));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.read().get(symbol).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.lookup(symbol, interval);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn lookup(&self, symbol: &str, interval: Interval) -> Result<BarSeries> {
        let key = (symbol.to_string(), interval);

        if let Some(message) = self.interval_failures.read().get(&key) {
            return Err(DataError::Unavailable(message.clone()));
        }
        if let Some(message) = self.failures.read().get(symbol) {
            return Err(DataError::Unavailable(message.clone()));
        }

        match self.series.read().get(&key) {
            Some(bars) if !bars.is_empty() => Ok(BarSeries::new(symbol, interval, bars.clone())),
            _ => Err(DataError::no_data(symbol)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn daily_history(
        &self,
        symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<BarSeries> {
        self.fetch(symbol, Interval::Day1).await
    }

    async fn intraday_chart(
        &self,
        symbol: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
        interval: Interval,
    ) -> Result<BarSeries> {
        self.fetch(symbol, interval).await
    }
}
