//! Volume-weighted indicators

use pulse_types::Bar;

/// Volume-weighted average price over the whole series, using the typical
/// price `(high + low + close) / 3`.
///
/// `None` for an empty series or zero total volume.
pub fn vwap(bars: &[Bar]) -> Option<f64> {
    let (weighted, volume) = bars.iter().fold((0.0, 0.0), |(weighted, volume), bar| {
        (weighted + bar.typical_price() * bar.volume, volume + bar.volume)
    });

    if volume == 0.0 {
        None
    } else {
        Some(weighted / volume)
    }
}
