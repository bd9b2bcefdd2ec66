//! OHLCV bars and oldest-first bar series

use crate::interval::Interval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV observation.
///
/// Providers are untrusted: a field the provider left empty is stored as
/// `f64::NAN` rather than dropping the bar, so indicator math propagates the
/// gap instead of silently shifting alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Midpoint of the bar's range
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Typical price used for volume weighting
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True when every price and volume field is a finite number
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Bars for one symbol at one interval, ordered oldest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    pub interval: Interval,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, reordering `bars` by ascending timestamp.
    ///
    /// Providers may hand back newest-first data; every consumer of a
    /// `BarSeries` may rely on index 0 being the oldest bar.
    pub fn new(symbol: impl Into<String>, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Oldest bar in the window
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Most recent bar in the window
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Copy of the series without bars that have missing fields
    pub fn complete_only(&self) -> BarSeries {
        BarSeries {
            symbol: self.symbol.clone(),
            interval: self.interval,
            bars: self
                .bars
                .iter()
                .filter(|bar| bar.is_complete())
                .copied()
                .collect(),
        }
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}
