//! Settings loading and validation.
//!
//! This module handles:
//! - Loading the optional settings.json file
//! - Defaults when no file is present
//! - Semantic validation (positive window, sane contamination)
//!
//! Resolution order is CLI flag > explicit path > built-in defaults; there
//! is no search through config directories, the store and settings both
//! live wherever the caller points.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default trailing lookback, in hours.
pub const DEFAULT_WINDOW_HOURS: i64 = 6;

/// Default expected fraction of anomalous readings.
pub const DEFAULT_CONTAMINATION: f64 = 0.10;

/// Default number of isolation trees.
pub const DEFAULT_TREES: usize = 100;

/// Default per-tree subsample size.
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Trailing-window settings for data loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Lookback length in hours; readings older than `now - hours` are
    /// excluded from detection.
    pub hours: i64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

/// Isolation-forest detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// Number of isolation trees in the ensemble.
    pub n_trees: usize,
    /// Per-tree subsample size (capped at the window size).
    pub sample_size: usize,
    /// Expected fraction of anomalous readings; calibrates the score
    /// threshold, the flagged count can differ from an exact fraction.
    pub contamination: f64,
    /// Fixed seed for reproducible runs. `None` draws an OS seed per call,
    /// so repeated detection over an identical window may differ.
    pub random_state: Option<u64>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        DetectorSettings {
            n_trees: DEFAULT_TREES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            contamination: DEFAULT_CONTAMINATION,
            random_state: None,
        }
    }
}

/// Traffic simulator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatorSettings {
    /// Fixed seed for reproducible simulated readings.
    pub random_state: Option<u64>,
}

/// Resolved Citywatch settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub detector: DetectorSettings,
    pub simulator: SimulatorSettings,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Settings> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::InvalidSettings {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings: Settings =
            serde_json::from_str(&raw).map_err(|e| Error::InvalidSettings {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit path, or fall back to validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Settings> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let settings = Settings::default();
                settings.validate()?;
                Ok(settings)
            }
        }
    }

    /// Semantic validation beyond shape/type checking.
    pub fn validate(&self) -> Result<()> {
        if self.window.hours < 1 {
            return Err(Error::Config(format!(
                "window.hours must be >= 1, got {}",
                self.window.hours
            )));
        }
        if self.detector.n_trees < 1 {
            return Err(Error::Config(format!(
                "detector.n_trees must be >= 1, got {}",
                self.detector.n_trees
            )));
        }
        if self.detector.sample_size < 2 {
            return Err(Error::Config(format!(
                "detector.sample_size must be >= 2, got {}",
                self.detector.sample_size
            )));
        }
        if !(self.detector.contamination > 0.0 && self.detector.contamination < 0.5) {
            return Err(Error::Config(format!(
                "detector.contamination must be in (0, 0.5), got {}",
                self.detector.contamination
            )));
        }
        Ok(())
    }
}
