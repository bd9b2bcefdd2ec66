//! Volatility indicators: true range, ATR and Bollinger Bands

use crate::moving_average::wilder_smoothing;
use crate::IndicatorSeries;
use pulse_types::Bar;

/// True range of every bar after the first.
///
/// Element `j` describes bar `j + 1`:
/// `max(high - low, |high - prev_close|, |low - prev_close|)`.
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            (bar.high - bar.low)
                .max((bar.high - prev.close).abs())
                .max((bar.low - prev.close).abs())
        })
        .collect()
}

/// Average True Range with Wilder smoothing.
///
/// The first value lands on bar `period` (the mean of the first `period`
/// true ranges), so the output starts with `period` `None`s. A series of
/// `period` bars or fewer yields no values.
pub fn atr(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut out = vec![None; bars.len()];

    for (j, value) in wilder_smoothing(&true_ranges(bars), period)
        .into_iter()
        .enumerate()
    {
        out[j + 1] = value;
    }

    out
}

/// One Bollinger Band reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bollinger Bands over a rolling window of `period` closes.
///
/// Uses the population standard deviation. The first `period - 1` entries
/// are `None`.
pub fn bollinger(closes: &[f64], period: usize, width: f64) -> Vec<Option<BollingerBands>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let p = period as f64;
    for (offset, window) in closes.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / p;
        let variance = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / p;
        let std_dev = variance.sqrt();

        out[offset + period - 1] = Some(BollingerBands {
            middle: mean,
            upper: mean + width * std_dev,
            lower: mean - width * std_dev,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                Bar::new(start + Duration::days(i as i64), close, high, low, close, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_true_range_uses_previous_close() {
        // Gap up: |high - prev_close| dominates the bar's own range
        let series = bars(&[(11.0, 9.0, 10.0), (16.0, 14.0, 15.0)]);
        assert_eq!(true_ranges(&series), vec![6.0]);
    }

    #[test]
    fn test_atr_alignment_and_smoothing() {
        let series = bars(&[
            (11.0, 9.0, 10.0),
            (12.0, 10.0, 11.0), // tr 2
            (13.0, 11.0, 12.0), // tr 2
            (16.0, 12.0, 15.0), // tr 4
            (15.0, 14.0, 14.5), // tr 1
        ]);

        let out = atr(&series, 2);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[3], Some(3.0)); // (2*1 + 4)/2
        assert_eq!(out[4], Some(2.0)); // (3*1 + 1)/2
    }

    #[test]
    fn test_atr_not_enough_bars() {
        let series = bars(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0)]);
        assert_eq!(atr(&series, 10), vec![None, None]);
        assert!(atr(&[], 10).is_empty());
    }

    #[test]
    fn test_bollinger_population_std_dev() {
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = bollinger(&closes, 8, 2.0);

        assert!(out[..7].iter().all(Option::is_none));
        let bands = out[7].unwrap();
        assert_eq!(bands.middle, 5.0);
        assert_eq!(bands.upper, 9.0); // std dev 2
        assert_eq!(bands.lower, 1.0);
    }
}
