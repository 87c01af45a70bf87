//! Fixed-duration tweens
//!
//! Elapsed time is accumulated as a [`Duration`] so that a run of frame
//! deltas summing to the configured duration lands exactly on the target.

use std::time::Duration;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Timing for a tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenConfig {
    pub duration: Duration,
    pub easing: Easing,
    /// Hold at the start value before moving; re-applied on every retarget
    pub delay: Duration,
}

impl TweenConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    pub fn millis(duration_ms: u64, easing: Easing) -> Self {
        Self::new(Duration::from_millis(duration_ms), easing)
    }

    /// Build from seconds, rejecting zero, negative and non-finite input
    pub fn from_secs(secs: f32, easing: Easing) -> Result<Self> {
        let duration =
            Duration::try_from_secs_f32(secs).map_err(|_| AnimationError::InvalidSeconds(secs))?;
        let config = Self::new(duration, easing);
        config.validate()?;
        Ok(config)
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay_ms(self, delay_ms: u64) -> Self {
        self.delay(Duration::from_millis(delay_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration.is_zero() {
            return Err(AnimationError::InvalidDuration(self.duration));
        }
        Ok(())
    }

    /// Delay plus duration
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Progress of one tween from `from` to `to`
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    config: TweenConfig,
    from: f32,
    to: f32,
    elapsed: Duration,
}

impl Tween {
    /// A tween that has not started moving yet
    pub fn new(config: TweenConfig, from: f32, to: f32) -> Self {
        Self {
            config,
            from,
            to,
            elapsed: Duration::ZERO,
        }
    }

    /// A finished tween resting at `value`
    pub fn at_rest(config: TweenConfig, value: f32) -> Self {
        Self {
            config,
            from: value,
            to: value,
            elapsed: config.total(),
        }
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Eased position along the path, 0 during the delay and 1 once complete
    pub fn progress(&self) -> f32 {
        let moving = self.elapsed.saturating_sub(self.config.delay);
        if moving >= self.config.duration {
            return 1.0;
        }
        let t = moving.as_secs_f64() / self.config.duration.as_secs_f64();
        self.config.easing.apply(t as f32)
    }

    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.progress()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.config.total()
    }

    /// Advance by `dt`; returns the part of `dt` left over after completion
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let remaining = self.config.total().saturating_sub(self.elapsed);
        if dt >= remaining {
            self.elapsed = self.config.total();
            dt - remaining
        } else {
            self.elapsed += dt;
            Duration::ZERO
        }
    }

    /// Start a fresh run from the current value toward `to`
    pub fn retarget(&mut self, to: f32) {
        self.from = self.value();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }

    /// Start a fresh run from `from` toward the existing target
    pub fn restart_from(&mut self, from: f32) {
        self.from = from;
        self.elapsed = Duration::ZERO;
    }

    /// Restart with explicit endpoints
    pub fn reset(&mut self, from: f32, to: f32) {
        self.from = from;
        self.to = to;
        self.elapsed = Duration::ZERO;
    }

    /// Finish immediately at `value`
    pub fn snap_to(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.elapsed = self.config.total();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_lands_exactly_on_target() {
        let mut tween = Tween::new(TweenConfig::millis(1000, Easing::EaseInOut), 0.0, 100.0);
        for _ in 0..3 {
            tween.advance(ms(333));
        }
        assert!(!tween.is_complete());
        tween.advance(ms(1));
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 100.0);
    }

    #[test]
    fn test_leftover_time() {
        let mut tween = Tween::new(TweenConfig::millis(300, Easing::Linear), 0.0, 1.0);
        assert_eq!(tween.advance(ms(200)), Duration::ZERO);
        assert_eq!(tween.advance(ms(250)), ms(150));
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_delay_holds_start_value() {
        let config = TweenConfig::millis(100, Easing::Linear).delay_ms(200);
        let mut tween = Tween::new(config, 10.0, 20.0);
        tween.advance(ms(150));
        assert_eq!(tween.value(), 10.0);
        tween.advance(ms(100));
        assert!((tween.value() - 15.0).abs() < 1e-4);
        tween.advance(ms(50));
        assert_eq!(tween.value(), 20.0);
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let mut tween = Tween::new(TweenConfig::millis(100, Easing::Linear), 0.0, 100.0);
        tween.advance(ms(50));
        tween.retarget(0.0);
        assert!((tween.from() - 50.0).abs() < 1e-3);
        assert_eq!(tween.elapsed(), Duration::ZERO);
        tween.advance(ms(100));
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_rejects_zero_and_negative_duration() {
        assert_eq!(
            TweenConfig::millis(0, Easing::Linear).validate(),
            Err(AnimationError::InvalidDuration(Duration::ZERO))
        );
        assert!(TweenConfig::from_secs(-1.0, Easing::Linear).is_err());
        assert!(TweenConfig::from_secs(f32::NAN, Easing::Linear).is_err());
        assert!(TweenConfig::from_secs(0.0, Easing::Linear).is_err());
        assert!(TweenConfig::from_secs(0.5, Easing::Linear).is_ok());
    }
}
