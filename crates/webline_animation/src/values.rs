//! Interpolating animated values into presentation values
//!
//! Animators produce one number. Presentation code maps that number onto
//! sizes, offsets and colours through piecewise-linear ranges.

use webline_core::{Rgba, Vec2};

use crate::easing::Easing;

/// Values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Rgba {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rgba::rgba(
            self.r.lerp(&other.r, t),
            self.g.lerp(&other.g, t),
            self.b.lerp(&other.b, t),
            self.a.lerp(&other.a, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.r.approx_eq(&other.r, epsilon)
            && self.g.approx_eq(&other.g, epsilon)
            && self.b.approx_eq(&other.b, epsilon)
            && self.a.approx_eq(&other.a, epsilon)
    }
}

/// Map `value` from `input` onto `output`, clamping outside the input range
pub fn remap(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (i0, i1) = input;
    if (i1 - i0).abs() < f32::EPSILON {
        return output.0;
    }
    let t = ((value - i0) / (i1 - i0)).clamp(0.0, 1.0);
    if t.is_nan() {
        return output.0;
    }
    output.0.lerp(&output.1, t)
}

/// Piecewise-linear map of `value` through matching input/output stops
///
/// `input` must be ascending and the same length as `output`; values
/// outside the input range clamp to the end stops. Returns `None` for
/// empty or mismatched ranges.
pub fn interpolate<T: Interpolate>(value: f32, input: &[f32], output: &[T]) -> Option<T> {
    if input.is_empty() || input.len() != output.len() {
        return None;
    }
    let last = input.len() - 1;
    if value.is_nan() || value <= input[0] {
        return Some(output[0].clone());
    }
    if value >= input[last] {
        return Some(output[last].clone());
    }
    let upper = input.iter().position(|&x| x >= value)?.max(1);
    let (i0, i1) = (input[upper - 1], input[upper]);
    if (i1 - i0).abs() < f32::EPSILON {
        return Some(output[upper].clone());
    }
    let t = (value - i0) / (i1 - i0);
    Some(output[upper - 1].lerp(&output[upper], t))
}

#[derive(Clone, Debug)]
struct Stop<T> {
    at: f32,
    value: T,
    easing: Easing,
}

/// A piecewise mapping from an animated number to `T`
///
/// Stops are kept sorted by input position; sampling clamps to the first
/// and last stop.
#[derive(Clone, Debug)]
pub struct Keyframes<T: Interpolate> {
    stops: Vec<Stop<T>>,
}

impl<T: Interpolate> Default for Keyframes<T> {
    fn default() -> Self {
        Self { stops: Vec::new() }
    }
}

impl<T: Interpolate> Keyframes<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop reached linearly from the previous one
    pub fn at(self, at: f32, value: T) -> Self {
        self.eased(at, value, Easing::Linear)
    }

    /// Add a stop reached through `easing` from the previous one
    pub fn eased(mut self, at: f32, value: T, easing: Easing) -> Self {
        self.stops.push(Stop { at, value, easing });
        self.stops.sort_by(|a, b| a.at.total_cmp(&b.at));
        self
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn sample(&self, input: f32) -> Option<T> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        if input.is_nan() || input <= first.at {
            return Some(first.value.clone());
        }
        if input >= last.at {
            return Some(last.value.clone());
        }

        let next_index = self.stops.iter().position(|s| s.at >= input)?;
        let next = &self.stops[next_index];
        let prev = &self.stops[next_index.saturating_sub(1)];
        if (next.at - prev.at).abs() < f32::EPSILON {
            return Some(next.value.clone());
        }

        let local = (input - prev.at) / (next.at - prev.at);
        Some(prev.value.lerp(&next.value, next.easing.apply(local)))
    }
}
