//! Indefinite loops between two bounds
//!
//! An oscillator never completes on its own. Its value is a pure function
//! of elapsed time, so long-running loops do not drift.

use std::f64::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use webline_core::hash_unit;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Shape of one loop cycle, expressed as a unit position in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Lower to upper and back within one period, easing each half
    PingPong(Easing),
    /// Lower to upper, then jump back to lower
    Sawtooth(Easing),
    /// Smooth sinusoid starting at lower
    Sine,
    /// Smoothed value noise, one fresh sample per period
    Noise { seed: u64 },
}

impl Waveform {
    fn sample(self, cycles: f64) -> f32 {
        let phase = cycles.rem_euclid(1.0) as f32;
        match self {
            Waveform::PingPong(easing) => {
                if phase < 0.5 {
                    easing.apply(phase * 2.0)
                } else {
                    easing.apply((1.0 - phase) * 2.0)
                }
            }
            Waveform::Sawtooth(easing) => easing.apply(phase),
            Waveform::Sine => (0.5 - 0.5 * (cycles.rem_euclid(1.0) * TAU).cos()) as f32,
            Waveform::Noise { seed } => {
                let index = cycles.floor() as i64 as u64;
                let a = hash_unit(seed, index);
                let b = hash_unit(seed, index.wrapping_add(1));
                let s = phase * phase * (3.0 - 2.0 * phase);
                a + (b - a) * s
            }
        }
    }
}

/// A looping rule
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopConfig {
    pub lower: f32,
    pub upper: f32,
    pub period: Duration,
    pub waveform: Waveform,
    /// Fraction of a period to skip ahead, in `[0, 1)`
    pub phase: f32,
    /// Travel from upper toward lower instead
    pub reversed: bool,
}

impl LoopConfig {
    pub fn new(lower: f32, upper: f32, period: Duration, waveform: Waveform) -> Self {
        Self {
            lower,
            upper,
            period,
            waveform,
            phase: 0.0,
            reversed: false,
        }
    }

    /// Ping-pong where each leg takes `leg_ms`
    pub fn ping_pong(lower: f32, upper: f32, leg_ms: u64, easing: Easing) -> Self {
        Self::new(
            lower,
            upper,
            Duration::from_millis(leg_ms * 2),
            Waveform::PingPong(easing),
        )
    }

    pub fn sawtooth(lower: f32, upper: f32, period_ms: u64, easing: Easing) -> Self {
        Self::new(
            lower,
            upper,
            Duration::from_millis(period_ms),
            Waveform::Sawtooth(easing),
        )
    }

    pub fn sine(lower: f32, upper: f32, period_ms: u64) -> Self {
        Self::new(lower, upper, Duration::from_millis(period_ms), Waveform::Sine)
    }

    pub fn noise(lower: f32, upper: f32, period_ms: u64, seed: u64) -> Self {
        Self::new(
            lower,
            upper,
            Duration::from_millis(period_ms),
            Waveform::Noise { seed },
        )
    }

    pub fn phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(AnimationError::InvalidLoopBounds {
                lower: self.lower,
                upper: self.upper,
            });
        }
        if self.period.is_zero() {
            return Err(AnimationError::InvalidPeriod(self.period));
        }
        Ok(())
    }
}

/// Running state of a loop
#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    config: LoopConfig,
    elapsed: Duration,
}

impl Oscillator {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            elapsed: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Whole periods completed so far
    pub fn cycles(&self) -> u64 {
        (self.elapsed.as_secs_f64() / self.config.period.as_secs_f64()) as u64
    }

    pub fn value(&self) -> f32 {
        let cfg = &self.config;
        let cycles =
            self.elapsed.as_secs_f64() / cfg.period.as_secs_f64() + f64::from(cfg.phase);
        let mut unit = cfg.waveform.sample(cycles).clamp(0.0, 1.0);
        if cfg.reversed {
            unit = 1.0 - unit;
        }
        (cfg.lower + (cfg.upper - cfg.lower) * unit).clamp(cfg.lower, cfg.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: LoopConfig, ms: u64) -> f32 {
        let mut osc = Oscillator::new(config);
        osc.advance(Duration::from_millis(ms));
        osc.value()
    }

    #[test]
    fn test_ping_pong_shape() {
        let cfg = LoopConfig::ping_pong(1.0, 1.5, 1000, Easing::Linear);
        assert_eq!(run(cfg, 0), 1.0);
        assert!((run(cfg, 500) - 1.25).abs() < 1e-4);
        assert!((run(cfg, 1000) - 1.5).abs() < 1e-4);
        assert!((run(cfg, 1500) - 1.25).abs() < 1e-4);
        assert!((run(cfg, 2000) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sawtooth_wraps() {
        let cfg = LoopConfig::sawtooth(-20.0, 500.0, 3000, Easing::Linear);
        assert_eq!(run(cfg, 0), -20.0);
        assert!((run(cfg, 1500) - 240.0).abs() < 1e-2);
        assert_eq!(run(cfg, 3000), -20.0);
    }

    #[test]
    fn test_reversed_sawtooth_starts_high() {
        let cfg = LoopConfig::sawtooth(0.0, 1.0, 2500, Easing::QuadOut).reversed();
        assert_eq!(run(cfg, 0), 1.0);
        assert!(run(cfg, 2400) < 0.05);
    }

    #[test]
    fn test_sine_starts_low_and_peaks_mid_period() {
        let cfg = LoopConfig::sine(-6.2, 6.2, 200);
        assert!((run(cfg, 0) + 6.2).abs() < 1e-4);
        assert!((run(cfg, 100) - 6.2).abs() < 1e-4);
    }

    #[test]
    fn test_noise_is_deterministic_and_bounded() {
        let cfg = LoopConfig::noise(4.0, 60.0, 90, 7);
        for ms in (0..5000).step_by(37) {
            let a = run(cfg, ms);
            assert_eq!(a, run(cfg, ms));
            assert!((4.0..=60.0).contains(&a));
        }
        assert_ne!(run(cfg, 0), run(LoopConfig::noise(4.0, 60.0, 90, 8), 0));
    }

    #[test]
    fn test_phase_offset() {
        let cfg = LoopConfig::ping_pong(0.0, 1.0, 500, Easing::Linear).phase(0.5);
        assert!((run(cfg, 0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_validation() {
        let ok = LoopConfig::sine(0.0, 1.0, 100);
        assert!(ok.validate().is_ok());
        assert!(LoopConfig::sine(1.0, 0.0, 100).validate().is_err());
        assert!(LoopConfig::sine(0.0, f32::INFINITY, 100).validate().is_err());
        assert_eq!(
            LoopConfig::sine(0.0, 1.0, 0).validate(),
            Err(AnimationError::InvalidPeriod(Duration::ZERO))
        );
        assert!(LoopConfig::sine(2.0, 2.0, 100).validate().is_ok());
    }
}
