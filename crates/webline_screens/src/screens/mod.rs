//! The six tab screens

pub mod calibration;
pub mod crime_map;
pub mod fitness;
pub mod mission_log;
pub mod suit_manager;
pub mod tactical;

pub use calibration::{
    CalibrationConfig, CalibrationScreen, CalibrationSnapshot, Param, ParticleSnapshot, WebMode,
    PARAM_STEP,
};
pub use crime_map::{Crime, CrimeMapConfig, CrimeMapScreen, CrimeMapSnapshot, MarkerSnapshot};
pub use fitness::{FitnessConfig, FitnessScreen, FitnessSnapshot, FitnessStat, StatSnapshot};
pub use mission_log::{
    MissionLogConfig, MissionLogScreen, MissionLogSnapshot, Task, TaskKind, TaskRowSnapshot,
    POWER_SEGMENTS,
};
pub use suit_manager::{
    Suit, SuitManagerConfig, SuitManagerScreen, SuitManagerSnapshot, SuitStats, READY_STATUS,
};
pub use tactical::{Palette, Spectrum, TacticalConfig, TacticalScreen, TacticalSnapshot};
