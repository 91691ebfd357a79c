//! Runtime configuration loaded from `habitual.yml`.

use crate::storage::BackendKind;
use crate::streak::{DEFAULT_MAX_WALK_DAYS, StreakConfig};
use crate::types::DEFAULT_COLOR;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "habitual.yml";

/// Application directory name under the platform config/data dirs.
const APP_DIR: &str = "habitual";

/// Days shown on each habit card.
pub const DEFAULT_GRID_DAYS: u32 = 7;

/// Longest recent-days strip a config may ask for.
pub const MAX_GRID_DAYS: u32 = 366;

/// Days in the statistics window.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Configuration for the habit tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the backend keeps its files (default: platform data dir)
    pub data_dir: Option<PathBuf>,

    /// Storage backend
    pub backend: BackendKind,

    /// Days in the per-habit recent-days strip
    pub grid_days: u32,

    /// Days in the statistics window
    pub window_days: u32,

    /// Bound on the current-streak walk
    pub max_walk_days: u32,

    /// Color for habits created without one
    pub default_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: BackendKind::default(),
            grid_days: DEFAULT_GRID_DAYS,
            window_days: DEFAULT_WINDOW_DAYS,
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from an explicit path, or the default location, or fall back to defaults.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse YAML text; missing fields keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Invalid YAML")?;
        if config.grid_days > MAX_GRID_DAYS {
            eyre::bail!("grid_days must be at most {}, got {}", MAX_GRID_DAYS, config.grid_days);
        }
        Ok(config)
    }

    /// Set the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the backend.
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the recent-days strip length.
    pub fn grid_days(mut self, days: u32) -> Self {
        self.grid_days = days;
        self
    }

    /// Set the statistics window.
    pub fn window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Set the current-streak walk bound.
    pub fn max_walk_days(mut self, days: u32) -> Self {
        self.max_walk_days = days;
        self
    }

    /// Resolved data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Streak settings derived from this config.
    pub fn streak(&self) -> StreakConfig {
        StreakConfig::new().max_walk_days(self.max_walk_days)
    }
}

/// `<config dir>/habitual/habitual.yml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
