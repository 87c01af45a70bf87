//! The screen abstraction shared by the shell and every tab

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use webline_animation::SchedulerHandle;
use webline_core::{Haptics, NoiseSource, Vec2};

use crate::error::ShellError;
use crate::screens::{
    CalibrationSnapshot, CrimeMapSnapshot, FitnessSnapshot, MissionLogSnapshot,
    SuitManagerSnapshot, TacticalSnapshot,
};

/// The six tabs, in tab-bar order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Calibration,
    CrimeMap,
    Tactical,
    SuitManager,
    MissionLog,
    Fitness,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 6] = [
        ScreenKind::Calibration,
        ScreenKind::CrimeMap,
        ScreenKind::Tactical,
        ScreenKind::SuitManager,
        ScreenKind::MissionLog,
        ScreenKind::Fitness,
    ];

    /// Position in the tab bar
    pub fn index(self) -> usize {
        match self {
            ScreenKind::Calibration => 0,
            ScreenKind::CrimeMap => 1,
            ScreenKind::Tactical => 2,
            ScreenKind::SuitManager => 3,
            ScreenKind::MissionLog => 4,
            ScreenKind::Fitness => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<ScreenKind> {
        Self::ALL.get(index).copied()
    }

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            ScreenKind::Calibration => "calibration",
            ScreenKind::CrimeMap => "map",
            ScreenKind::Tactical => "tactical",
            ScreenKind::SuitManager => "suits",
            ScreenKind::MissionLog => "missions",
            ScreenKind::Fitness => "fitness",
        }
    }

    /// Tab label
    pub fn label(self) -> &'static str {
        match self {
            ScreenKind::Calibration => "Calibration",
            ScreenKind::CrimeMap => "Map",
            ScreenKind::Tactical => "MJ",
            ScreenKind::SuitManager => "Suits",
            ScreenKind::MissionLog => "Missions",
            ScreenKind::Fitness => "Fitness",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenKind {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "calibration" | "lab" => Ok(ScreenKind::Calibration),
            "map" | "crime_map" => Ok(ScreenKind::CrimeMap),
            "tactical" | "mj" => Ok(ScreenKind::Tactical),
            "suits" | "suit_manager" => Ok(ScreenKind::SuitManager),
            "missions" | "mission_log" => Ok(ScreenKind::MissionLog),
            "fitness" | "bio" => Ok(ScreenKind::Fitness),
            _ => Err(ShellError::UnknownScreen(s.to_string())),
        }
    }
}

/// What every screen needs from the session that owns it
#[derive(Clone)]
pub struct ScreenContext {
    pub handle: SchedulerHandle,
    /// Session noise; screens derive their own stream from it
    pub noise: NoiseSource,
    pub haptics: Rc<dyn Haptics>,
    /// Logical screen size used by full-width sweeps
    pub viewport: Vec2,
}

impl ScreenContext {
    /// Noise stream reserved for one screen
    pub fn noise_for(&self, kind: ScreenKind) -> NoiseSource {
        self.noise.derive(kind.name())
    }
}

impl fmt::Debug for ScreenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenContext")
            .field("handle", &self.handle)
            .field("seed", &self.noise.seed())
            .field("viewport", &self.viewport)
            .finish()
    }
}

/// A tab's state model
///
/// Continuous motion lives in the shared scheduler and keeps running while
/// the tab is hidden. `tick` advances the discrete, periodic data (timers,
/// random readouts, text effects) and is only called for the visible tab.
pub trait Screen {
    fn kind(&self) -> ScreenKind;

    fn tick(&mut self, dt: Duration);

    /// Presentation values for the current frame
    fn snapshot(&self) -> ScreenSnapshot;
}

/// Presentation values of one screen
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenSnapshot {
    Calibration(CalibrationSnapshot),
    CrimeMap(CrimeMapSnapshot),
    Tactical(TacticalSnapshot),
    SuitManager(SuitManagerSnapshot),
    MissionLog(MissionLogSnapshot),
    Fitness(FitnessSnapshot),
}

impl ScreenSnapshot {
    pub fn kind(&self) -> ScreenKind {
        match self {
            ScreenSnapshot::Calibration(_) => ScreenKind::Calibration,
            ScreenSnapshot::CrimeMap(_) => ScreenKind::CrimeMap,
            ScreenSnapshot::Tactical(_) => ScreenKind::Tactical,
            ScreenSnapshot::SuitManager(_) => ScreenKind::SuitManager,
            ScreenSnapshot::MissionLog(_) => ScreenKind::MissionLog,
            ScreenSnapshot::Fitness(_) => ScreenKind::Fitness,
        }
    }
}

/// Context over a test scheduler with a fixed seed and a recording haptics log
#[cfg(test)]
pub(crate) fn test_context(
    handle: SchedulerHandle,
    haptics: &webline_core::HapticLog,
) -> ScreenContext {
    ScreenContext {
        handle,
        noise: NoiseSource::new(7),
        haptics: Rc::new(haptics.clone()),
        viewport: Vec2::new(390.0, 844.0),
    }
}
