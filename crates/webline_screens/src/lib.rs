//! Webline Screens
//!
//! State models for the tab shell and its six screens. Nothing here draws:
//! each screen turns user actions and elapsed time into presentation values
//! (offsets, opacities, fills, colours, text) that a renderer reads through
//! snapshots.
//!
//! # Features
//!
//! - **Shell**: sliding tab indicator, focus tweens, clamped tab selection
//! - **Screens**: calibration lab, crime map, target profile, suit manager,
//!   mission log and biometrics, each seeded with mock data from config
//! - **Text effects**: typewriter, glitch, data stream, marquee, console
//! - **Config**: one TOML file, every key optional
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use webline_core::NoHaptics;
//! use webline_screens::{ScreenKind, Session, ShellConfig};
//!
//! let mut session = Session::new(&ShellConfig::default(), Rc::new(NoHaptics)).unwrap();
//! session.shell_mut().select_screen(ScreenKind::MissionLog);
//! session.shell_mut().missions_mut().toggle(1);
//! session.advance(Duration::from_millis(16));
//!
//! assert_eq!(session.shell().missions().charge(), 13.0);
//! ```

pub mod config;
pub mod error;
pub mod screen;
pub mod screens;
pub mod shell;
pub mod text_fx;

pub use config::ShellConfig;
pub use error::{Result, ShellError};
pub use screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
pub use screens::{
    CalibrationScreen, CrimeMapScreen, FitnessScreen, MissionLogScreen, Param, Spectrum,
    SuitManagerScreen, TacticalScreen,
};
pub use shell::{Session, Shell, ShellSnapshot, TabSnapshot};
pub use text_fx::{ConsoleCycler, DataStream, Glitch, Marquee, Typewriter};
