//! Momentum oscillators: RSI and MACD

use crate::moving_average::ema;
use crate::IndicatorSeries;

/// Relative Strength Index for every bar.
///
/// Each value uses the simple mean of the last `period` gains and losses
/// (not Wilder smoothing). When the average loss is 0 the relative strength
/// is taken as 100. The first `period` entries are `None`.
pub fn rsi_series(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    for (offset, window) in changes.windows(period).enumerate() {
        out[offset + period] = Some(rsi_from_changes(window));
    }

    out
}

/// RSI of the latest close; `None` with fewer than `period + 1` closes
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }
    let changes: Vec<f64> = closes[closes.len() - period - 1..]
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    Some(rsi_from_changes(&changes))
}

fn rsi_from_changes(changes: &[f64]) -> f64 {
    let n = changes.len() as f64;
    let avg_gain = changes.iter().map(|c| c.max(0.0)).sum::<f64>() / n;
    let avg_loss = changes.iter().map(|c| (-c).max(0.0)).sum::<f64>() / n;

    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}

/// MACD lines, aligned with the input closes
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn latest_histogram(&self) -> Option<f64> {
        self.histogram.last().copied()
    }
}

/// MACD from first-value-seeded EMAs: `fast - slow`, its `signal` EMA, and
/// the histogram between them.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let macd_line: Vec<f64> = ema(closes, fast)
        .into_iter()
        .zip(ema(closes, slow))
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Macd {
        macd_line,
        signal_line,
        histogram,
    }
}
