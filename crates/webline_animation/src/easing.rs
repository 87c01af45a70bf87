//! Easing curves
//!
//! Every curve has `apply(0) == 0` and `apply(1) == 1` and, apart from
//! custom beziers with out-of-range control points, stays within `[0, 1]`.
//! Input outside `[0, 1]` is clamped first.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// An easing curve for tweens, ping-pong loops and sawtooth ramps
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// CSS `ease-in`, cubic-bezier(0.42, 0, 1, 1)
    EaseIn,
    /// CSS `ease-out`, cubic-bezier(0, 0, 0.58, 1)
    EaseOut,
    /// CSS `ease-in-out`, cubic-bezier(0.42, 0, 0.58, 1)
    #[default]
    EaseInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    ExpIn,
    ExpOut,
    /// Quarter sine, `1 - cos(t * PI / 2)`
    Sine,
    SineInOut,
    /// Arbitrary cubic bezier with control points `(x1, y1)` and `(x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Evaluate the curve at `t`
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }

        let y = match self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::ExpIn => 2.0_f32.powf(10.0 * (t - 1.0)),
            Easing::ExpOut => 1.0 - 2.0_f32.powf(-10.0 * t),
            Easing::Sine => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicBezier(x1, y1, x2, y2) => {
                let y = cubic_bezier(x1, y1, x2, y2, t);
                // control points outside [0, 1] are allowed to overshoot
                if !(0.0..=1.0).contains(&y1) || !(0.0..=1.0).contains(&y2) {
                    return y;
                }
                y
            }
        };
        y.clamp(0.0, 1.0)
    }
}

/// Solve a unit cubic bezier for `x` and return its `y`
///
/// Newton iterations with a bisection fallback; `x1`/`x2` are clamped into
/// `[0, 1]` so the curve stays a function of `x`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;
    let slope_x = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    let mut s = x;
    for _ in 0..8 {
        let err = sample_x(s) - x;
        if err.abs() < 1e-6 {
            return sample_y(s);
        }
        let d = slope_x(s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let sx = sample_x(s);
        if (sx - x).abs() < 1e-6 {
            break;
        }
        if sx < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    sample_y(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 15] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::ExpIn,
        Easing::ExpOut,
        Easing::Sine,
        Easing::SineInOut,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn test_endpoints_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_monotone_and_in_unit_range() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!((0.0..=1.0).contains(&v), "{easing:?} at {i}: {v}");
                assert!(v + 1e-4 >= prev, "{easing:?} not monotone at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_input_clamped() {
        assert_eq!(Easing::QuadIn.apply(-3.0), 0.0);
        assert_eq!(Easing::QuadIn.apply(7.0), 1.0);
        assert_eq!(Easing::QuadIn.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_ease_in_out_symmetric_midpoint() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-3);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_serde_names() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;

        let de: StrDeserializer<'_, Error> = "cubic_out".into_deserializer();
        assert_eq!(Easing::deserialize(de).unwrap(), Easing::CubicOut);
    }
}
