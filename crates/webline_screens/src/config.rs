//! Session configuration
//!
//! Everything a session needs is in one TOML file. Every table and key is
//! optional; missing ones fall back to the built-in mock data.
//!
//! ```toml
//! seed = 42
//! tab_bar_width = 350.0
//!
//! [scheduler]
//! target_fps = 60
//!
//! [calibration]
//! pressure = 80.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use webline_animation::SchedulerConfig;
use webline_core::Vec2;

use crate::error::{Result, ShellError};
use crate::screens::{
    CalibrationConfig, CrimeMapConfig, FitnessConfig, MissionLogConfig, SuitManagerConfig,
    TacticalConfig,
};

/// Top-level session configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Seed for every cosmetic random stream
    pub seed: u64,
    /// Width of the floating tab bar; each tab gets a sixth
    pub tab_bar_width: f32,
    /// Logical screen size
    pub viewport: Vec2,
    pub scheduler: SchedulerConfig,
    pub calibration: CalibrationConfig,
    pub crime_map: CrimeMapConfig,
    pub tactical: TacticalConfig,
    pub suits: SuitManagerConfig,
    pub missions: MissionLogConfig,
    pub fitness: FitnessConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            seed: 2025,
            tab_bar_width: 350.0,
            viewport: Vec2::new(390.0, 844.0),
            scheduler: SchedulerConfig::default(),
            calibration: CalibrationConfig::default(),
            crime_map: CrimeMapConfig::default(),
            tactical: TacticalConfig::default(),
            suits: SuitManagerConfig::default(),
            missions: MissionLogConfig::default(),
            fitness: FitnessConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShellConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ShellError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate()?;

        if !(self.tab_bar_width.is_finite() && self.tab_bar_width > 0.0) {
            return Err(ShellError::Invalid(format!(
                "tab_bar_width must be positive, got {}",
                self.tab_bar_width
            )));
        }
        let viewport_ok = [self.viewport.x, self.viewport.y]
            .iter()
            .all(|side| side.is_finite() && *side > 0.0);
        if !viewport_ok {
            return Err(ShellError::Invalid(format!(
                "viewport must be positive and finite, got {}x{}",
                self.viewport.x, self.viewport.y
            )));
        }

        let cal = &self.calibration;
        for (name, value) in [
            ("viscosity", cal.viscosity),
            ("pressure", cal.pressure),
            ("tensile", cal.tensile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ShellError::Invalid(format!(
                    "calibration.{name} must be within 0..=100, got {value}"
                )));
            }
        }

        if self.fitness.bpm_min > self.fitness.bpm_max {
            return Err(ShellError::Invalid(format!(
                "fitness.bpm_min ({}) exceeds bpm_max ({})",
                self.fitness.bpm_min, self.fitness.bpm_max
            )));
        }
        if self
            .fitness
            .stats
            .iter()
            .any(|s| !(s.max.is_finite() && s.max > 0.0))
        {
            return Err(ShellError::Invalid(
                "fitness stat max must be positive and finite".into(),
            ));
        }
        if self.suits.suits.is_empty() {
            return Err(ShellError::Invalid("at least one suit is required".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = ShellConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ShellConfig::from_toml_str(
            r#"
            seed = 42

            [calibration]
            pressure = 55.0

            [fitness]
            bpm_min = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.calibration.pressure, 55.0);
        assert_eq!(config.calibration.viscosity, 65.0);
        assert_eq!(config.fitness.bpm_min, 50);
        assert_eq!(config.fitness.bpm_max, 65);
        assert_eq!(config.suits.suits.len(), 5);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = ShellConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ShellConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_unusable_values() {
        let err = ShellConfig::from_toml_str("tab_bar_width = 0.0").unwrap_err();
        assert!(matches!(err, ShellError::Invalid(_)));

        let err = ShellConfig::from_toml_str("[fitness]\nbpm_min = 90").unwrap_err();
        assert!(err.to_string().contains("bpm_min"));

        let err = ShellConfig::from_toml_str("[calibration]\npressure = 120.0").unwrap_err();
        assert!(err.to_string().contains("calibration.pressure"));

        let err = ShellConfig::from_toml_str("[viewport]\nx = 390.0\ny = inf\n").unwrap_err();
        assert!(err.to_string().contains("viewport"));
        let err = ShellConfig::from_toml_str("[viewport]\nx = nan\ny = 844.0\n").unwrap_err();
        assert!(matches!(err, ShellError::Invalid(_)));

        let err = ShellConfig::from_toml_str("[scheduler]\ntarget_fps = 0").unwrap_err();
        assert!(matches!(err, ShellError::Animation(_)));

        assert!(matches!(
            ShellConfig::from_toml_str("seed = \"abc\""),
            Err(ShellError::Parse(_))
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = ShellConfig::load(Path::new("/nonexistent/webline.toml")).unwrap_err();
        assert!(matches!(err, ShellError::Io { .. }));
    }
}
