//! Error types for webline_animation

use std::time::Duration;
use thiserror::Error;

/// Rule configurations that can never converge or are meaningless
///
/// These are rejected when an animator is created. Operations on live
/// animators (retarget, tick, cancel) never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Tween duration is zero (or was negative / non-finite before conversion)
    #[error("tween duration must be positive, got {0:?}")]
    InvalidDuration(Duration),

    /// Duration given in seconds could not be represented
    #[error("duration must be a positive finite number of seconds, got {0}")]
    InvalidSeconds(f32),

    /// Spring parameter out of range
    #[error("spring {parameter} must be positive and finite, got {value}")]
    InvalidSpring { parameter: &'static str, value: f32 },

    /// Spring responds faster than the integrator can follow
    #[error("spring is too stiff to integrate stably (response rate {rate}/s)")]
    SpringTooStiff { rate: f32 },

    /// Loop bounds are inverted or not finite
    #[error("loop bounds must be finite with lower <= upper, got [{lower}, {upper}]")]
    InvalidLoopBounds { lower: f32, upper: f32 },

    /// Loop or interval period is zero
    #[error("period must be positive, got {0:?}")]
    InvalidPeriod(Duration),

    /// Scheduler frame rate is zero
    #[error("target frame rate must be positive")]
    InvalidFrameRate,
}

/// Result type for webline_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
