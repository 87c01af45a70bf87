//! Value domains and clamping
//!
//! Every presentation value in Webline lives inside a declared domain.
//! Out-of-domain input is never an error: it is clamped.

use serde::{Deserialize, Serialize};

/// Clamp `value` into `[min, max]`.
///
/// Total over all `f32` inputs: NaN maps to `min`, infinities map to the
/// nearest bound, and swapped bounds are reordered instead of panicking
/// (unlike `f32::clamp`). The result is idempotent.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    // f32::max returns the non-NaN operand, so NaN collapses to `lo`
    value.max(lo).min(hi)
}

/// A closed numeric interval `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f32,
    pub max: f32,
}

impl Domain {
    /// Percentage-style values (slider positions, fill levels)
    pub const PERCENT: Domain = Domain {
        min: 0.0,
        max: 100.0,
    };

    /// Normalized values (opacity, progress, blend factors)
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };

    /// No restriction beyond finiteness
    pub const UNBOUNDED: Domain = Domain {
        min: f32::MIN,
        max: f32::MAX,
    };

    /// Create a domain, reordering the bounds if given backwards
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        clamp(value, self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Map `t` in `[0, 1]` onto this domain
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + self.span() * t
    }

    /// Check that both bounds are finite and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_is_identity() {
        assert_eq!(clamp(42.0, 0.0, 100.0), 42.0);
    }

    #[test]
    fn test_clamp_outside() {
        assert_eq!(clamp(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(105.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(f32::INFINITY, 0.0, 100.0), 100.0);
        assert_eq!(clamp(f32::NEG_INFINITY, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_clamp_nan_goes_to_min() {
        assert_eq!(clamp(f32::NAN, 8.0, 100.0), 8.0);
    }

    #[test]
    fn test_clamp_swapped_bounds() {
        assert_eq!(clamp(150.0, 100.0, 0.0), 100.0);
        assert_eq!(clamp(-1.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_domain_new_reorders() {
        let d = Domain::new(10.0, -10.0);
        assert_eq!(d.min, -10.0);
        assert_eq!(d.max, 10.0);
        assert!(d.is_valid());
        assert_eq!(d.lerp(0.5), 0.0);
    }
}
