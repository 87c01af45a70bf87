//! Spring physics animation
//!
//! RK4-integrated damped spring. Frame deltas are split into substeps no
//! longer than the spring's own time scale, so stiff springs stay stable
//! when a frame hitches.

use crate::error::{AnimationError, Result};

/// Longest single integration step, in seconds
pub const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Shortest integration step a spring may need, in seconds
///
/// Springs whose response rate demands a finer step are rejected by
/// [`SpringConfig::validate`].
pub const MIN_SUBSTEP: f32 = 1.0e-4;

/// Upper bound on integration steps for one call to [`Spring::step`]
///
/// Time beyond `MAX_SUBSTEPS` stable substeps is dropped for that frame.
pub const MAX_SUBSTEPS: u32 = 4096;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target below which the spring may come to rest
    pub rest_displacement: f32,
    /// Speed below which the spring may come to rest
    pub rest_velocity: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_displacement: 0.01,
            rest_velocity: 0.05,
        }
    }

    /// Convert origami-style tension/friction into stiffness/damping
    ///
    /// Mass is 1. A tension of 40 and friction of 7 is the classic
    /// "bouncy panel" feel.
    pub fn from_tension_friction(tension: f32, friction: f32) -> Self {
        let stiffness = (tension - 30.0) * 3.62 + 194.0;
        let damping = (friction - 8.0) * 3.0 + 25.0;
        Self::new(stiffness, damping, 1.0)
    }

    /// Spring with the given stiffness and damping ratio (1.0 is critical)
    pub fn with_damping_ratio(stiffness: f32, ratio: f32, mass: f32) -> Self {
        let critical = 2.0 * (stiffness * mass).abs().sqrt();
        Self::new(stiffness, ratio * critical, mass)
    }

    /// Override the rest thresholds
    pub fn rest_thresholds(mut self, displacement: f32, velocity: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_velocity = velocity;
        self
    }

    /// The tab indicator spring: responsive with a little overshoot
    pub fn indicator() -> Self {
        Self::new(120.0, 15.0, 1.0)
    }

    /// Slide-in for detail panels (tension 50, friction 7)
    pub fn panel() -> Self {
        Self::from_tension_friction(50.0, 7.0)
    }

    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Reject configurations that can never converge
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("rest displacement", self.rest_displacement),
            ("rest velocity", self.rest_velocity),
        ];
        for (parameter, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnimationError::InvalidSpring { parameter, value });
            }
        }
        let rate = self.response_rate();
        if !rate.is_finite() || rate * MIN_SUBSTEP > 1.0 {
            return Err(AnimationError::SpringTooStiff { rate });
        }
        Ok(())
    }

    /// Upper bound on the magnitude of the spring's eigenvalues, in 1/s
    ///
    /// `sqrt(k / m) + c / m` covers both the oscillating and the
    /// overdamped regimes.
    pub fn response_rate(&self) -> f32 {
        (self.stiffness / self.mass).sqrt() + self.damping / self.mass
    }

    /// Integration step that keeps RK4 inside its stability region
    pub fn substep(&self) -> f32 {
        let rate = self.response_rate();
        if rate.is_finite() && rate > 0.0 {
            MAX_SUBSTEP.min(1.0 / rate).max(MIN_SUBSTEP)
        } else {
            MIN_SUBSTEP
        }
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Will overshoot and oscillate around the target
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A damped spring moving a value toward a target
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring at rest at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Move the target; current value and velocity carry over
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Place the spring at `value` with zero velocity, keeping the target
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Place the spring at rest at `value`
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_displacement
            && self.velocity.abs() < self.config.rest_velocity
    }

    /// Advance by `dt` seconds; returns true once at rest on the target
    pub fn step(&mut self, dt: f32) -> bool {
        if dt.is_nan() || dt <= 0.0 {
            return self.settle_if_resting();
        }

        let max_h = self.config.substep();
        let wanted = (dt / max_h).ceil().max(1.0);
        let (substeps, h) = if wanted > MAX_SUBSTEPS as f32 {
            (MAX_SUBSTEPS, max_h)
        } else {
            let n = wanted as u32;
            (n, dt / n as f32)
        };
        for _ in 0..substeps {
            if self.settle_if_resting() {
                return true;
            }
            self.integrate(h);
        }
        self.settle_if_resting()
    }

    fn settle_if_resting(&mut self) -> bool {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            true
        } else {
            false
        }
    }

    fn integrate(&mut self, dt: f32) {
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_exactly_on_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);

        let mut settled = false;
        for _ in 0..120 {
            settled = spring.step(1.0 / 60.0);
        }

        assert!(settled);
        assert_eq!(spring.value(), 100.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(100.0);
        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_tension_friction_conversion() {
        let panel = SpringConfig::panel();
        assert!((panel.stiffness - 266.4).abs() < 1e-3);
        assert!((panel.damping - 22.0).abs() < 1e-6);
        assert!(panel.is_underdamped());
    }

    #[test]
    fn test_damping_ratio() {
        let critical = SpringConfig::with_damping_ratio(100.0, 1.0, 1.0);
        assert!((critical.damping - 20.0).abs() < 1e-4);
        assert!(SpringConfig::with_damping_ratio(100.0, 1.5, 1.0).is_overdamped());
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(SpringConfig::indicator().validate().is_ok());
        assert_eq!(
            SpringConfig::new(100.0, 10.0, 0.0).validate(),
            Err(AnimationError::InvalidSpring {
                parameter: "mass",
                value: 0.0
            })
        );
        assert!(SpringConfig::new(-1.0, 10.0, 1.0).validate().is_err());
        assert!(SpringConfig::new(100.0, 0.0, 1.0).validate().is_err());
        assert!(SpringConfig::new(f32::NAN, 10.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_large_frame_is_substepped() {
        let mut spring = Spring::new(SpringConfig::new(600.0, 40.0, 1.0), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(0.25);
            assert!(spring.value().is_finite());
            assert!(spring.value() < 1500.0);
            assert!(spring.value() > -500.0);
        }
        assert_eq!(spring.value(), 1000.0);
    }

    #[test]
    fn test_heavier_mass_still_settles() {
        let mut spring = Spring::new(SpringConfig::new(400.0, 25.0, 2.0), 0.0);
        spring.set_target(100.0);

        for _ in 0..240 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
    }

    #[test]
    fn test_stiff_spring_stays_bounded_and_settles() {
        let config = SpringConfig::new(1.0e6, 10.0, 1.0);
        assert!(config.validate().is_ok());
        assert!(config.substep() < 1.0 / 1000.0);

        let mut spring = Spring::new(config, 0.0);
        spring.set_target(10.0);

        let mut settled = false;
        for _ in 0..600 {
            settled = spring.step(1.0 / 60.0);
            assert!(spring.value().is_finite());
            assert!(spring.value().abs() <= 20.0);
        }
        assert!(settled);
        assert_eq!(spring.value(), 10.0);
    }

    #[test]
    fn test_stiff_spring_survives_long_frame() {
        let mut spring = Spring::new(SpringConfig::new(1.0e6, 400.0, 1.0), 0.0);
        spring.set_target(100.0);

        for _ in 0..20 {
            spring.step(2.0);
            assert!(spring.value().is_finite());
            assert!(spring.value().abs() <= 200.0);
        }
    }

    #[test]
    fn test_validate_rejects_unintegrable_springs() {
        let tiny_mass = SpringConfig::new(100.0, 10.0, 1.0e-4);
        assert!(matches!(
            tiny_mass.validate(),
            Err(AnimationError::SpringTooStiff { .. })
        ));
        assert!(matches!(
            SpringConfig::new(1.0e12, 10.0, 1.0).validate(),
            Err(AnimationError::SpringTooStiff { .. })
        ));
        assert!(matches!(
            SpringConfig::new(f32::MAX, 10.0, f32::MIN_POSITIVE).validate(),
            Err(AnimationError::SpringTooStiff { .. })
        ));
    }

    #[test]
    fn test_gentle_springs_keep_frame_substep() {
        assert_eq!(SpringConfig::indicator().substep(), MAX_SUBSTEP);
        assert_eq!(SpringConfig::stiff().substep(), MAX_SUBSTEP);
    }

    #[test]
    fn test_zero_dt_does_not_move() {
        let mut spring = Spring::new(SpringConfig::indicator(), 10.0);
        spring.set_target(20.0);
        assert!(!spring.step(0.0));
        assert_eq!(spring.value(), 10.0);
    }
}
