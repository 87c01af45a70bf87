//! The scalar animator
//!
//! One numeric value driven by exactly one [`Rule`]. Rules are validated at
//! creation; afterwards every operation is total. A cancelled animator is
//! frozen: retarget, tick and jump are no-ops.

use std::time::Duration;

use webline_core::Domain;

use crate::error::Result;
use crate::oscillator::{LoopConfig, Oscillator};
use crate::spring::{Spring, SpringConfig};
use crate::tween::{Tween, TweenConfig};

/// How an animator moves toward its target
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    Spring(SpringConfig),
    Tween(TweenConfig),
    Loop(LoopConfig),
}

impl Rule {
    pub fn validate(&self) -> Result<()> {
        match self {
            Rule::Spring(cfg) => cfg.validate(),
            Rule::Tween(cfg) => cfg.validate(),
            Rule::Loop(cfg) => cfg.validate(),
        }
    }
}

impl From<SpringConfig> for Rule {
    fn from(cfg: SpringConfig) -> Self {
        Rule::Spring(cfg)
    }
}

impl From<TweenConfig> for Rule {
    fn from(cfg: TweenConfig) -> Self {
        Rule::Tween(cfg)
    }
}

impl From<LoopConfig> for Rule {
    fn from(cfg: LoopConfig) -> Self {
        Rule::Loop(cfg)
    }
}

/// Lifecycle of an animator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorState {
    /// At rest, nothing to do
    Idle,
    /// Moving; needs ticks
    Running,
    /// Reached its target since the last retarget
    Complete,
    /// Stopped for good
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Spring(Spring),
    Tween(Tween),
    Loop(Oscillator),
}

/// A single animated number
#[derive(Clone, Debug)]
pub struct Animator {
    motion: Motion,
    state: AnimatorState,
    bounds: Domain,
    /// Start value and target used by [`Animator::rewind`]
    origin: (f32, f32),
}

impl Animator {
    /// Create an animator resting at `initial`
    ///
    /// Springs and tweens start idle; loops start running immediately.
    pub fn new(initial: f32, rule: impl Into<Rule>) -> Result<Self> {
        let rule = rule.into();
        rule.validate()?;

        let (motion, state) = match rule {
            Rule::Spring(cfg) => (Motion::Spring(Spring::new(cfg, initial)), AnimatorState::Idle),
            Rule::Tween(cfg) => (Motion::Tween(Tween::at_rest(cfg, initial)), AnimatorState::Idle),
            Rule::Loop(cfg) => (Motion::Loop(Oscillator::new(cfg)), AnimatorState::Running),
        };

        let origin = match motion {
            Motion::Loop(osc) => (osc.value(), osc.value()),
            _ => (initial, initial),
        };

        Ok(Self {
            motion,
            state,
            bounds: Domain::UNBOUNDED,
            origin,
        })
    }

    /// Create an animator at `from` already heading for `to`
    pub fn animate(from: f32, to: f32, rule: impl Into<Rule>) -> Result<Self> {
        let mut animator = Self::new(from, rule)?;
        animator.retarget(to);
        animator.origin = (from, animator.target());
        Ok(animator)
    }

    /// Keep the value and every target inside `bounds`
    pub fn with_bounds(mut self, bounds: Domain) -> Self {
        self.bounds = bounds;
        let value = bounds.clamp(self.raw_value());
        let target = bounds.clamp(self.target());
        self.origin = (bounds.clamp(self.origin.0), bounds.clamp(self.origin.1));
        match &mut self.motion {
            Motion::Spring(spring) => {
                spring.set_value(value);
                spring.set_target(target);
            }
            Motion::Tween(tween) => {
                if tween.is_complete() {
                    tween.snap_to(target);
                } else {
                    tween.reset(value, target);
                }
            }
            Motion::Loop(_) => {}
        }
        self
    }

    pub fn bounds(&self) -> Domain {
        self.bounds
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == AnimatorState::Complete
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == AnimatorState::Cancelled
    }

    /// Not moving: idle, complete or cancelled
    pub fn is_at_rest(&self) -> bool {
        self.state != AnimatorState::Running
    }

    /// Eased tween progress in `[0, 1]`; `None` for springs and loops
    pub fn progress(&self) -> Option<f32> {
        match &self.motion {
            Motion::Tween(tween) => Some(tween.progress()),
            _ => None,
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.motion, Motion::Loop(_))
    }

    /// Current value, always within the animator's bounds
    pub fn value(&self) -> f32 {
        self.bounds.clamp(self.raw_value())
    }

    fn raw_value(&self) -> f32 {
        match &self.motion {
            Motion::Spring(spring) => spring.value(),
            Motion::Tween(tween) => tween.value(),
            Motion::Loop(osc) => osc.value(),
        }
    }

    /// Where the animator is heading; loops report their current value
    pub fn target(&self) -> f32 {
        match &self.motion {
            Motion::Spring(spring) => spring.target(),
            Motion::Tween(tween) => tween.to(),
            Motion::Loop(osc) => osc.value(),
        }
    }

    /// Spring velocity in units per second, zero for other rules
    pub fn velocity(&self) -> f32 {
        match &self.motion {
            Motion::Spring(spring) => spring.velocity(),
            _ => 0.0,
        }
    }

    /// Head for a new target from the current value
    ///
    /// Springs keep their velocity; tweens restart their full duration from
    /// the current value. Loops ignore retargeting.
    pub fn retarget(&mut self, target: f32) {
        if self.is_cancelled() {
            return;
        }
        let target = self.bounds.clamp(target);
        match &mut self.motion {
            Motion::Spring(spring) => spring.set_target(target),
            Motion::Tween(tween) => tween.retarget(target),
            Motion::Loop(_) => {
                tracing::trace!(target, "retarget ignored by loop");
                return;
            }
        }
        self.state = AnimatorState::Running;
    }

    /// Advance by `dt` and return the new value
    pub fn tick(&mut self, dt: Duration) -> f32 {
        self.advance(dt);
        self.value()
    }

    /// Advance by `dt`; returns the portion of `dt` not needed to finish
    ///
    /// Only tweens report leftover time. Springs settle at an unknown
    /// instant inside the frame and loops never finish. An idle or
    /// completed animator needs none of `dt` and hands all of it back.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        match self.state {
            AnimatorState::Running => {}
            AnimatorState::Idle | AnimatorState::Complete => return dt,
            AnimatorState::Cancelled => return Duration::ZERO,
        }
        match &mut self.motion {
            Motion::Spring(spring) => {
                if spring.step(dt.as_secs_f32()) {
                    self.state = AnimatorState::Complete;
                }
                Duration::ZERO
            }
            Motion::Tween(tween) => {
                let leftover = tween.advance(dt);
                if tween.is_complete() {
                    self.state = AnimatorState::Complete;
                }
                leftover
            }
            Motion::Loop(osc) => {
                osc.advance(dt);
                Duration::ZERO
            }
        }
    }

    /// Stop for good; returns false if already cancelled
    pub fn cancel(&mut self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.state = AnimatorState::Cancelled;
        true
    }

    /// Place the value immediately and come to rest there
    pub fn jump_to(&mut self, value: f32) {
        if self.is_cancelled() {
            return;
        }
        let value = self.bounds.clamp(value);
        match &mut self.motion {
            Motion::Spring(spring) => spring.snap_to(value),
            Motion::Tween(tween) => tween.snap_to(value),
            Motion::Loop(_) => return,
        }
        self.state = AnimatorState::Idle;
    }

    /// Run again toward the current target starting from `value`
    ///
    /// Used when a chained animator takes over from its predecessor.
    pub fn restart_from(&mut self, value: f32) {
        if self.is_cancelled() {
            return;
        }
        let value = self.bounds.clamp(value);
        match &mut self.motion {
            Motion::Spring(spring) => spring.set_value(value),
            Motion::Tween(tween) => tween.restart_from(value),
            Motion::Loop(osc) => osc.restart(),
        }
        self.state = AnimatorState::Running;
    }

    /// Return to the start value and target given at creation, running
    pub fn rewind(&mut self) {
        if self.is_cancelled() {
            return;
        }
        let (from, to) = self.origin;
        match &mut self.motion {
            Motion::Spring(spring) => {
                spring.set_value(from);
                spring.set_target(to);
            }
            Motion::Tween(tween) => tween.reset(from, to),
            Motion::Loop(osc) => osc.restart(),
        }
        self.state = AnimatorState::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::error::AnimationError;

    const FRAME: Duration = Duration::from_micros(16_667);

    #[test]
    fn test_tween_lifecycle() {
        let mut a = Animator::new(0.0, TweenConfig::millis(300, Easing::Linear)).unwrap();
        assert_eq!(a.state(), AnimatorState::Idle);

        a.retarget(100.0);
        assert!(a.is_running());
        a.tick(Duration::from_millis(150));
        assert!((a.value() - 50.0).abs() < 1e-3);
        a.tick(Duration::from_millis(150));
        assert_eq!(a.value(), 100.0);
        assert!(a.is_complete());
    }

    #[test]
    fn test_spring_completes_on_settle() {
        let mut a = Animator::animate(0.0, 240.0, SpringConfig::indicator()).unwrap();
        for _ in 0..600 {
            a.tick(FRAME);
        }
        assert!(a.is_complete());
        assert_eq!(a.value(), 240.0);
    }

    #[test]
    fn test_loop_runs_immediately_and_ignores_retarget() {
        let mut a = Animator::new(0.0, LoopConfig::ping_pong(0.2, 1.0, 800, Easing::Linear)).unwrap();
        assert!(a.is_running());
        assert_eq!(a.value(), 0.2);

        a.retarget(50.0);
        a.tick(Duration::from_millis(800));
        assert!((a.value() - 1.0).abs() < 1e-4);
        assert!(a.is_running());
    }

    #[test]
    fn test_cancelled_is_frozen() {
        let mut a = Animator::animate(0.0, 10.0, TweenConfig::millis(100, Easing::Linear)).unwrap();
        a.tick(Duration::from_millis(50));
        let frozen = a.value();

        assert!(a.cancel());
        assert!(!a.cancel());
        a.retarget(99.0);
        a.tick(Duration::from_millis(500));
        a.jump_to(3.0);
        assert_eq!(a.value(), frozen);
        assert!(a.is_cancelled());
    }

    #[test]
    fn test_bounds_clamp_value_and_target() {
        let mut a = Animator::new(150.0, TweenConfig::millis(100, Easing::Linear))
            .unwrap()
            .with_bounds(Domain::PERCENT);
        assert_eq!(a.value(), 100.0);

        a.retarget(-40.0);
        assert_eq!(a.target(), 0.0);
        a.tick(Duration::from_millis(100));
        assert_eq!(a.value(), 0.0);
    }

    #[test]
    fn test_jump_to_rests() {
        let mut a = Animator::animate(0.0, 100.0, SpringConfig::stiff()).unwrap();
        a.tick(FRAME);
        a.jump_to(42.0);
        assert_eq!(a.state(), AnimatorState::Idle);
        assert_eq!(a.value(), 42.0);
        assert_eq!(a.target(), 42.0);
        assert_eq!(a.velocity(), 0.0);
    }

    #[test]
    fn test_rewind_replays_from_origin() {
        let mut a = Animator::animate(0.3, 1.0, TweenConfig::millis(500, Easing::Linear)).unwrap();
        a.tick(Duration::from_millis(500));
        assert!(a.is_complete());

        a.rewind();
        assert!(a.is_running());
        assert_eq!(a.value(), 0.3);
    }

    #[test]
    fn test_invalid_rules_rejected() {
        assert!(matches!(
            Animator::new(0.0, TweenConfig::millis(0, Easing::Linear)),
            Err(AnimationError::InvalidDuration(_))
        ));
        assert!(Animator::new(0.0, SpringConfig::new(100.0, 10.0, 0.0)).is_err());
        assert!(Animator::new(0.0, LoopConfig::sine(1.0, 0.0, 100)).is_err());
        assert!(matches!(
            Animator::new(0.0, SpringConfig::new(100.0, 10.0, 1.0e-4)),
            Err(AnimationError::SpringTooStiff { .. })
        ));
    }

    #[test]
    fn test_very_stiff_spring_completes() {
        let mut a = Animator::animate(0.0, 10.0, SpringConfig::new(1.0e6, 10.0, 1.0)).unwrap();
        for _ in 0..600 {
            let value = a.tick(FRAME);
            assert!(value.is_finite() && value.abs() <= 20.0);
        }
        assert!(a.is_complete());
        assert_eq!(a.value(), 10.0);
    }

    #[test]
    fn test_advance_hands_back_time_when_not_running() {
        let mut idle = Animator::new(5.0, SpringConfig::indicator()).unwrap();
        assert_eq!(idle.advance(FRAME), FRAME);

        let mut done = Animator::animate(0.0, 1.0, TweenConfig::millis(100, Easing::Linear)).unwrap();
        assert_eq!(done.advance(Duration::from_millis(100)), Duration::ZERO);
        assert!(done.is_complete());
        assert_eq!(done.advance(FRAME), FRAME);

        done.cancel();
        assert_eq!(done.advance(FRAME), Duration::ZERO);
    }
}
