//! Property-based invariant tests for clamping and the calibration metrics.
//!
//! 1. `clamp` output lies within bounds for any input, including NaN/inf.
//! 2. `clamp` is idempotent.
//! 3. Stability is always within `[8, 100]`.
//! 4. With pressure fixed, stability never increases as `|pressure - viscosity|` grows.
//! 5. Checksum is always a four character label.
//! 6. Oscilloscope bars stay within `[4, 60]`.

use proptest::prelude::*;
use webline_core::metrics::{
    self, format_checksum, oscilloscope_bar, CHECKSUM, PRESSURE, STABILITY, TENSILE, VISCOSITY,
};
use webline_core::{clamp, Params};

fn any_f32() -> impl Strategy<Value = f32> {
    prop_oneof![
        -1e9f32..1e9f32,
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

fn params(pressure: f32, viscosity: f32, tensile: f32) -> Params {
    let mut p = Params::new();
    p.insert(PRESSURE.to_string(), pressure);
    p.insert(VISCOSITY.to_string(), viscosity);
    p.insert(TENSILE.to_string(), tensile);
    p
}

proptest! {
    #[test]
    fn clamp_within_bounds(x in any_f32(), a in -1e6f32..1e6f32, b in -1e6f32..1e6f32) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let c = clamp(x, a, b);
        prop_assert!(c >= lo && c <= hi);
    }

    #[test]
    fn clamp_is_idempotent(x in any_f32(), lo in -1e6f32..0.0f32, hi in 0.0f32..1e6f32) {
        let once = clamp(x, lo, hi);
        prop_assert_eq!(clamp(once, lo, hi), once);
    }

    #[test]
    fn stability_within_bounds(p in any_f32(), v in any_f32(), t in any_f32()) {
        let out = metrics::calibration().compute(&params(p, v, t));
        prop_assert!(out[STABILITY] >= 8.0 && out[STABILITY] <= 100.0);
    }

    #[test]
    fn stability_monotone_in_separation(v1 in 0.0f32..=100.0, v2 in 0.0f32..=100.0) {
        let calc = metrics::calibration();
        let (near, far) = if (80.0 - v1).abs() <= (80.0 - v2).abs() { (v1, v2) } else { (v2, v1) };
        let s_near = calc.compute_one(STABILITY, &params(80.0, near, 70.0)).unwrap();
        let s_far = calc.compute_one(STABILITY, &params(80.0, far, 70.0)).unwrap();
        prop_assert!(s_near >= s_far, "near={} s={} far={} s={}", near, s_near, far, s_far);
    }

    #[test]
    fn checksum_label_is_four_chars(p in any_f32(), v in any_f32(), t in any_f32()) {
        let out = metrics::calibration().compute(&params(p, v, t));
        prop_assert_eq!(format_checksum(out[CHECKSUM]).len(), 4);
    }

    #[test]
    fn oscilloscope_bar_bounds(s in any_f32(), n in any_f32()) {
        let h = oscilloscope_bar(s, n);
        prop_assert!((4.0..=60.0).contains(&h));
    }
}

#[test]
fn stock_calibration_point() {
    let out = metrics::calibration().compute(&params(80.0, 65.0, 70.0));
    assert!((8.0..=100.0).contains(&out[STABILITY]));
    assert_eq!(out[STABILITY], 92.0);
}
