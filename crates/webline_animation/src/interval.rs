//! Fixed-period timers for discrete refreshes
//!
//! Screens use these for work that happens every N milliseconds rather than
//! continuously: refreshing random readouts, rotating log lines, revealing
//! typewriter characters.

use std::time::Duration;

use crate::error::{AnimationError, Result};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Counts how many periods elapse across frame deltas
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: Duration,
    accumulated: Duration,
    fired: u64,
}

impl Interval {
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(AnimationError::InvalidPeriod(period));
        }
        Ok(Self {
            period,
            accumulated: Duration::ZERO,
            fired: 0,
        })
    }

    pub fn millis(period_ms: u64) -> Result<Self> {
        Self::new(Duration::from_millis(period_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total firings since creation or the last reset
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Time since the last firing
    pub fn since_last(&self) -> Duration {
        self.accumulated
    }

    /// Advance by `dt`; returns how many periods completed
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(dt);
        let periods = self.accumulated.as_nanos() / self.period.as_nanos();
        if periods == 0 {
            return 0;
        }
        // remainder < period, so it fits back into a Duration
        let remainder = self.accumulated.as_nanos() % self.period.as_nanos();
        self.accumulated = Duration::new(
            (remainder / NANOS_PER_SEC) as u64,
            (remainder % NANOS_PER_SEC) as u32,
        );
        let count = u32::try_from(periods).unwrap_or(u32::MAX);
        self.fired = self.fired.saturating_add(u64::from(count));
        count
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.fired = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_per_period() {
        let mut iv = Interval::millis(100).unwrap();
        assert_eq!(iv.advance(Duration::from_millis(99)), 0);
        assert_eq!(iv.advance(Duration::from_millis(1)), 1);
        assert_eq!(iv.advance(Duration::from_millis(350)), 3);
        assert_eq!(iv.since_last(), Duration::from_millis(50));
        assert_eq!(iv.fired(), 4);
    }

    #[test]
    fn test_huge_delta_counts_in_one_step() {
        let mut iv = Interval::new(Duration::from_nanos(1)).unwrap();
        let dt = Duration::from_secs(3600) + Duration::from_nanos(7);
        assert_eq!(iv.advance(dt), u32::MAX);
        assert_eq!(iv.since_last(), Duration::ZERO);

        let mut iv = Interval::millis(100).unwrap();
        assert_eq!(iv.advance(Duration::from_secs(86_400) + Duration::from_millis(42)), 864_000);
        assert_eq!(iv.since_last(), Duration::from_millis(42));
        assert_eq!(iv.fired(), 864_000);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Interval::millis(0).is_err());
    }
}
