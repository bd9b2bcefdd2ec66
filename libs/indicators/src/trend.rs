//! Trend indicators: Supertrend and ADX/DMI

use crate::moving_average::wilder_smoothing;
use crate::volatility::{atr, true_ranges};
use crate::IndicatorSeries;
use pulse_types::{Bar, TrendDirection};

/// Supertrend line and direction, both aligned with the input bars
#[derive(Debug, Clone, PartialEq)]
pub struct Supertrend {
    pub values: IndicatorSeries,
    pub direction: Vec<TrendDirection>,
}

impl Supertrend {
    /// Direction on the most recent bar (`Neutral` for an empty or warm-up series)
    pub fn last_direction(&self) -> TrendDirection {
        self.direction.last().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.direction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direction.is_empty()
    }
}

/// Supertrend over ATR bands.
///
/// The line is seeded at bar `atr_period` with `hl2` and direction `Up`.
/// From then on a close above the previous line ratchets it up to the lower
/// band, a close below ratchets it down to the upper band, and a close equal
/// to the line carries both forward. Warm-up bars are `Neutral` / `None`.
pub fn supertrend(bars: &[Bar], atr_period: usize, factor: f64) -> Supertrend {
    let ranges = atr(bars, atr_period);
    let mut values = vec![None; bars.len()];
    let mut direction = vec![TrendDirection::Neutral; bars.len()];
    let mut state: Option<(f64, TrendDirection)> = None;

    for (i, bar) in bars.iter().enumerate() {
        let Some(atr) = ranges[i] else { continue };

        let hl2 = bar.hl2();
        let upper = hl2 + factor * atr;
        let lower = hl2 - factor * atr;

        let next = match state {
            None => (hl2, TrendDirection::Up),
            Some((prev, _)) if bar.close > prev => (lower.max(prev), TrendDirection::Up),
            Some((prev, _)) if bar.close < prev => (upper.min(prev), TrendDirection::Down),
            Some(carried) => carried,
        };

        values[i] = Some(next.0);
        direction[i] = next.1;
        state = Some(next);
    }

    Supertrend { values, direction }
}

/// Directional movement system output, aligned with the input bars
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalIndex {
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
    pub adx: IndicatorSeries,
}

impl DirectionalIndex {
    /// Latest `(adx, +DI, -DI)`, each `None` while still warming up
    pub fn latest(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        let last = |series: &IndicatorSeries| series.last().copied().flatten();
        (last(&self.adx), last(&self.plus_di), last(&self.minus_di))
    }
}

/// Average Directional Index with +DI / -DI.
///
/// +DI and -DI are first defined at bar `di_period`; ADX, the Wilder
/// smoothing of DX, first at bar `di_period + adx_period - 1`.
///
/// Degenerate ratios fall back to zero: a smoothed true range of 0 gives
/// DI = 0, and +DI + -DI = 0 gives DX = 0.
pub fn adx(bars: &[Bar], di_period: usize, adx_period: usize) -> DirectionalIndex {
    let n = bars.len();
    let mut plus_di = vec![None; n];
    let mut minus_di = vec![None; n];
    let mut adx = vec![None; n];

    let (plus_dm, minus_dm): (Vec<f64>, Vec<f64>) = bars
        .windows(2)
        .map(|pair| directional_movement(&pair[0], &pair[1]))
        .unzip();

    let tr_smoothed = wilder_smoothing(&true_ranges(bars), di_period);
    let plus_smoothed = wilder_smoothing(&plus_dm, di_period);
    let minus_smoothed = wilder_smoothing(&minus_dm, di_period);

    // DX is contiguous once the first DI exists
    let mut dx = Vec::with_capacity(n);
    let mut dx_start = None;

    let smoothed = tr_smoothed.iter().zip(&plus_smoothed).zip(&minus_smoothed);
    for (j, ((tr, plus), minus)) in smoothed.enumerate() {
        let (Some(tr), Some(plus), Some(minus)) = (*tr, *plus, *minus) else {
            continue;
        };

        let pdi = percent_of(plus, tr);
        let mdi = percent_of(minus, tr);
        plus_di[j + 1] = Some(pdi);
        minus_di[j + 1] = Some(mdi);

        dx.push(percent_of((pdi - mdi).abs(), pdi + mdi));
        dx_start.get_or_insert(j + 1);
    }

    if let Some(start) = dx_start {
        for (k, value) in wilder_smoothing(&dx, adx_period).into_iter().enumerate() {
            adx[start + k] = value;
        }
    }

    DirectionalIndex {
        plus_di,
        minus_di,
        adx,
    }
}

/// `(+DM, -DM)` for `bar` relative to `prev`
fn directional_movement(prev: &Bar, bar: &Bar) -> (f64, f64) {
    let up = bar.high - prev.high;
    let down = prev.low - bar.low;

    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };
    (plus, minus)
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        100.0 * part / whole
    }
}
