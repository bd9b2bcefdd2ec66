//! Exponential and Wilder moving averages

use crate::IndicatorSeries;

/// Exponential moving average seeded with the first value.
///
/// `ema[0] = values[0]`, then `ema[i] = values[i] * k + ema[i-1] * (1 - k)`
/// with `k = 2 / (period + 1)`. There is no SMA warm-up window; downstream
/// score thresholds are calibrated against this seeding.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = first;
    out.push(prev);

    for &value in rest {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }

    out
}

/// Wilder's smoothing (RMA), aligned with `values`.
///
/// The first value, at index `period - 1`, is the simple mean of the first
/// `period` inputs; after that
/// `out[i] = (out[i-1] * (period - 1) + values[i]) / period`.
/// Returns all `None` when `values` is shorter than `period` or `period` is 0.
pub fn wilder_smoothing(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let p = period as f64;
    let mut prev = values[..period].iter().sum::<f64>() / p;
    out[period - 1] = Some(prev);

    for (i, &value) in values.iter().enumerate().skip(period) {
        prev = (prev * (p - 1.0) + value) / p;
        out[i] = Some(prev);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_ema_seeds_from_first_value() {
        let out = ema(&[10.0, 20.0, 30.0], 3);

        // k = 0.5
        assert_eq!(out.len(), 3);
        assert_close(out[0], 10.0);
        assert_close(out[1], 15.0);
        assert_close(out[2], 22.5);
    }

    #[test]
    fn test_ema_empty_input() {
        assert!(ema(&[], 9).is_empty());
    }

    #[test]
    fn test_wilder_smoothing() {
        let out = wilder_smoothing(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);

        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2].unwrap(), 2.0); // (1+2+3)/3
        assert_close(out[3].unwrap(), (2.0 * 2.0 + 4.0) / 3.0);
        assert_close(out[4].unwrap(), (out[3].unwrap() * 2.0 + 5.0) / 3.0);
    }

    #[test]
    fn test_wilder_smoothing_short_input() {
        assert_eq!(wilder_smoothing(&[1.0, 2.0], 3), vec![None, None]);
        assert_eq!(wilder_smoothing(&[1.0, 2.0], 0), vec![None, None]);
    }
}
