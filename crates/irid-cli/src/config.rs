//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter, overridden by `--log-level` and `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Print JSON instead of text by default
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".iridescia"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self, CliError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("cannot determine config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set the default log level after checking it names a level
    pub fn set_log_level(&mut self, level: &str) -> Result<(), CliError> {
        level
            .parse::<LevelFilter>()
            .map_err(|_| CliError::Config(format!("unknown log level {:?}", level)))?;
        self.log_level = level.to_ascii_lowercase();
        Ok(())
    }
}
