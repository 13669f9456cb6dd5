//! Survey configuration file support.
//!
//! Settings are read from a TOML file with one table per component. Every
//! table and key is optional:
//!
//! ```toml
//! [scheduler]
//! zenith_avoidance_deg = 5.0
//!
//! [tiledb]
//! tileid_start = 1000
//!
//! [overlap]
//! boundary_step_deg = 1.0
//! min_boundary_points = 5
//! cone_steps = 64
//!
//! [simulation]
//! idle_step_s = 300.0
//! overhead_s = 0.0
//!
//! [numeric]
//! policy = "raise"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SchedulerError};
use crate::numeric::FloatPolicy;

/// Survey configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub tiledb: TileDbSettings,
    #[serde(default)]
    pub overlap: OverlapConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub numeric: NumericSettings,
}

/// Selector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Margin below the zenith that pointings must stay under, in degrees
    #[serde(default = "default_zenith_avoidance")]
    pub zenith_avoidance_deg: f64,
}

/// Tile catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDbSettings {
    /// Id of the first survey tile; lower ids are reserved for special tiles
    #[serde(default = "default_tileid_start")]
    pub tileid_start: i64,
}

/// Overlap resolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapConfig {
    /// Boundary sampling step, in degrees
    #[serde(default = "default_boundary_step")]
    pub boundary_step_deg: f64,
    /// Minimum samples per boundary edge
    #[serde(default = "default_min_boundary_points")]
    pub min_boundary_points: usize,
    /// Vertices used to approximate circular regions
    #[serde(default = "default_cone_steps")]
    pub cone_steps: usize,
}

/// Night simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Time to wait when no tile is observable, in seconds
    #[serde(default = "default_idle_step")]
    pub idle_step_s: f64,
    /// Dead time added after every visit, in seconds
    #[serde(default)]
    pub overhead_s: f64,
}

/// Floating point settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSettings {
    #[serde(default)]
    pub policy: FloatPolicy,
}

fn default_zenith_avoidance() -> f64 {
    5.0
}

fn default_tileid_start() -> i64 {
    1000
}

fn default_boundary_step() -> f64 {
    1.0
}

fn default_min_boundary_points() -> usize {
    5
}

fn default_cone_steps() -> usize {
    64
}

fn default_idle_step() -> f64 {
    300.0
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            zenith_avoidance_deg: default_zenith_avoidance(),
        }
    }
}

impl Default for TileDbSettings {
    fn default() -> Self {
        Self {
            tileid_start: default_tileid_start(),
        }
    }
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            boundary_step_deg: default_boundary_step(),
            min_boundary_points: default_min_boundary_points(),
            cone_steps: default_cone_steps(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            idle_step_s: default_idle_step(),
            overhead_s: 0.0,
        }
    }
}

impl SurveyConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SurveyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SurveyConfig)` if successful
    /// * `Err(SchedulerError::Configuration)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedulerError::Configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `survey.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from("survey.toml"),
            PathBuf::from("rust_backend/survey.toml"),
            PathBuf::from("../survey.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(SchedulerError::Configuration(
            "No survey.toml found in standard locations".to_string(),
        ))
    }

    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tiledb.tileid_start < 0 {
            return Err(SchedulerError::NegativeTileIdStart(self.tiledb.tileid_start));
        }
        if !(0.0..90.0).contains(&self.scheduler.zenith_avoidance_deg) {
            return Err(SchedulerError::Configuration(format!(
                "zenith_avoidance_deg must be in [0, 90), got {}",
                self.scheduler.zenith_avoidance_deg
            )));
        }
        if self.overlap.boundary_step_deg <= 0.0 {
            return Err(SchedulerError::Configuration(
                "boundary_step_deg must be positive".to_string(),
            ));
        }
        if self.overlap.cone_steps < 3 {
            return Err(SchedulerError::Configuration(
                "cone_steps must be at least 3".to_string(),
            ));
        }
        if self.simulation.idle_step_s <= 0.0 || self.simulation.overhead_s < 0.0 {
            return Err(SchedulerError::Configuration(
                "idle_step_s must be positive and overhead_s non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SurveyConfig::from_toml_str("").unwrap();
        assert_eq!(config, SurveyConfig::default());
        assert_eq!(config.scheduler.zenith_avoidance_deg, 5.0);
        assert_eq!(config.tiledb.tileid_start, 1000);
        assert_eq!(config.overlap.min_boundary_points, 5);
        assert_eq!(config.numeric.policy, FloatPolicy::Raise);
    }

    #[test]
    fn partial_tables_fill_defaults() {
        let config = SurveyConfig::from_toml_str(
            r#"
            [overlap]
            cone_steps = 32

            [numeric]
            policy = "ignore"
            "#,
        )
        .unwrap();
        assert_eq!(config.overlap.cone_steps, 32);
        assert_eq!(config.overlap.boundary_step_deg, 1.0);
        assert_eq!(config.numeric.policy, FloatPolicy::Ignore);
    }

    #[test]
    fn negative_tileid_start_is_rejected() {
        let err = SurveyConfig::from_toml_str("[tiledb]\ntileid_start = -5\n").unwrap_err();
        assert!(matches!(err, SchedulerError::NegativeTileIdStart(-5)));
    }

    #[test]
    fn bad_toml_is_a_configuration_error() {
        let err = SurveyConfig::from_toml_str("[scheduler\n").unwrap_err();
        assert!(matches!(err, SchedulerError::Configuration(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\nzenith_avoidance_deg = 3.5").unwrap();
        let config = SurveyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.scheduler.zenith_avoidance_deg, 3.5);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = SurveyConfig::from_file("/nonexistent/survey.toml").unwrap_err();
        assert!(matches!(err, SchedulerError::Configuration(_)));
    }
}
