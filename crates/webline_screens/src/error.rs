//! Error types for webline_screens

use std::path::PathBuf;
use thiserror::Error;
use webline_animation::AnimationError;

/// Failures while building or configuring the shell
///
/// User interactions (toggling a task, selecting a suit) never fail; they
/// ignore unknown ids instead. Errors only come from configuration.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ShellConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written back out as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config parsed but describes something unusable
    #[error("invalid config: {0}")]
    Invalid(String),

    /// An animation rule built from the config was rejected
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// No screen answers to this name
    #[error("unknown screen '{0}' (expected one of: calibration, map, tactical, suits, missions, fitness)")]
    UnknownScreen(String),

    /// No calibration parameter answers to this name
    #[error("unknown parameter '{0}' (expected viscosity, pressure or tensile)")]
    UnknownParam(String),
}

/// Result type for webline_screens operations
pub type Result<T> = std::result::Result<T, ShellError>;
