//! Dynamic certificate tolerance bands.
//!
//! The acceptable deviation from a certified value depends on its
//! magnitude: small concentrations get an absolute floor, larger ones a
//! shrinking percentage band.

use oes_model::ToleranceBands;

/// Half-width of the acceptable band around a certified value.
pub fn dynamic_half_width(certified: f64, bands: &ToleranceBands) -> f64 {
    let magnitude = certified.abs();
    if magnitude < 10.0 {
        bands.range_low
    } else if magnitude < 100.0 {
        magnitude * bands.range_mid / 100.0
    } else if magnitude < 1_000.0 {
        magnitude * bands.range_high1 / 100.0
    } else if magnitude < 10_000.0 {
        magnitude * bands.range_high2 / 100.0
    } else if magnitude < 100_000.0 {
        magnitude * bands.range_high3 / 100.0
    } else {
        magnitude * bands.range_high4 / 100.0
    }
}

/// Acceptable range `[certified - half, certified + half]`.
pub fn acceptable_range(certified: f64, bands: &ToleranceBands) -> (f64, f64) {
    let half = dynamic_half_width(certified, bands);
    (certified - half, certified + half)
}

/// True when a measured value falls strictly inside the certified band.
/// A value sitting exactly on a band edge counts as out of range.
pub fn in_range(measured: f64, certified: f64, bands: &ToleranceBands) -> bool {
    let (low, high) = acceptable_range(certified, bands);
    measured > low && measured < high
}
