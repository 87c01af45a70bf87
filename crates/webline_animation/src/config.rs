//! Scheduler configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Frame pacing for [`crate::AnimationScheduler`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Frames per second used for the nominal frame delta
    pub target_fps: u32,
    /// Longest wall-clock delta a single frame may advance by, in ms
    pub max_frame_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frame_ms: 250,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(AnimationError::InvalidFrameRate);
        }
        Ok(())
    }

    /// Nominal delta between frames
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms).max(self.frame_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let cfg = SchedulerConfig {
            target_fps: 50,
            ..Default::default()
        };
        assert_eq!(cfg.frame_duration(), Duration::from_millis(20));
        assert!(SchedulerConfig {
            target_fps: 0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }
}
