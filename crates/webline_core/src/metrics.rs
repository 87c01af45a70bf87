//! Screen metric formulas
//!
//! Each screen keeps its own formula; they share only the [`Calculator`]
//! machinery. All inputs are percentage-style values in `[0, 100]`.

use crate::derived::{Calculator, DerivedMetric, Rounding};
use crate::domain::clamp;

pub const PRESSURE: &str = "pressure";
pub const VISCOSITY: &str = "viscosity";
pub const TENSILE: &str = "tensile";
pub const STABILITY: &str = "stability";
pub const CHECKSUM: &str = "checksum";

/// Lowest stability the calibration screen ever reports
pub const STABILITY_FLOOR: f32 = 8.0;

const HIGH_PRESSURE: f32 = 90.0;
const HIGH_PRESSURE_PENALTY: f32 = 10.0;
const LOW_VISCOSITY: f32 = 30.0;
const LOW_VISCOSITY_PENALTY: f32 = 6.0;

const CHECKSUM_MODULUS: f32 = 9999.0;

/// Unrounded, unclamped stability score
///
/// `100 - |pressure - viscosity| * 0.5`, minus 10 when pressure exceeds 90
/// and 6 when viscosity drops below 30.
pub fn raw_stability(pressure: f32, viscosity: f32) -> f32 {
    let mut stability = 100.0 - (pressure - viscosity).abs() * 0.5;
    if pressure > HIGH_PRESSURE {
        stability -= HIGH_PRESSURE_PENALTY;
    }
    if viscosity < LOW_VISCOSITY {
        stability -= LOW_VISCOSITY_PENALTY;
    }
    stability
}

/// Raw checksum over the three calibration parameters
pub fn raw_checksum(viscosity: f32, pressure: f32, tensile: f32) -> f32 {
    let sum = viscosity.round() * 7.0 + pressure.round() * 11.0 + tensile.round() * 5.0;
    sum.rem_euclid(CHECKSUM_MODULUS)
}

/// Calculator for the calibration screen: `stability` and `checksum`
pub fn calibration() -> Calculator {
    Calculator::new()
        .metric(
            DerivedMetric::new(STABILITY, |i| raw_stability(i.get(PRESSURE), i.get(VISCOSITY)))
                .input(PRESSURE)
                .input(VISCOSITY)
                .bounds(STABILITY_FLOOR, 100.0)
                .rounding(Rounding::Floor),
        )
        .metric(
            DerivedMetric::new(CHECKSUM, |i| {
                raw_checksum(i.get(VISCOSITY), i.get(PRESSURE), i.get(TENSILE))
            })
            .input(VISCOSITY)
            .input(PRESSURE)
            .input(TENSILE)
            .bounds(0.0, CHECKSUM_MODULUS - 1.0),
        )
}

/// Zero-padded four digit checksum label
pub fn format_checksum(checksum: f32) -> String {
    format!("{:04}", clamp(checksum, 0.0, CHECKSUM_MODULUS - 1.0) as u32)
}

/// Mission charge: completed share of tasks, rounded to a whole percent
pub fn charge_percent(done: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    clamp((done as f32 / total as f32 * 100.0).round(), 0.0, 100.0)
}

/// Number of lit segments in a segmented power bar
///
/// Segment `i` is lit when `i / segments * 100 < charge`.
pub fn lit_segments(charge: f32, segments: usize) -> usize {
    (0..segments)
        .filter(|&i| (i as f32 / segments as f32) * 100.0 < charge)
        .count()
}

/// Fill percentage of a stat bar (`value / max * 100`, clamped)
pub fn stat_fill(value: f32, max: f32) -> f32 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    clamp(value / max * 100.0, 0.0, 100.0)
}

/// Height of one oscilloscope bar for a stability score and a noise sample
///
/// `noise` is a unit sample in `[0, 1)`. Unstable fluid produces taller,
/// noisier bars; the result always lies in `[4, 60]`.
pub fn oscilloscope_bar(stability: f32, noise: f32) -> f32 {
    let stability = clamp(stability, 0.0, 100.0);
    let noise = clamp(noise, 0.0, 1.0) * (100.0 - stability);
    let base = stability / 1.6;
    clamp(base + noise - 12.0, 4.0, 60.0)
}
