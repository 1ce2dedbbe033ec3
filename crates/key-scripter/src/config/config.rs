//! Configuration management for key-scripter.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, load-time validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    atomic_file::write_atomically,
    config::{BehaviourConfig, DEFAULT_MACRO_FILE_NAME, HotkeyConfig, ScriptConfig},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Global hotkeys.
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    /// Identifiers used when rendering macro text.
    #[serde(default)]
    pub script: ScriptConfig,
    /// Application behavior settings.
    #[serde(default)]
    pub behavior: BehaviourConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing the defaults there if it does
    /// not exist. Hotkey names are validated before returning.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.hotkeys.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomically(path, &contents)?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// File recordings are written to and playback reads from.
    #[track_caller]
    pub fn macro_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.behavior.macro_file {
            return Ok(path.clone());
        }
        Ok(Self::project_dirs()?
            .data_dir()
            .join(DEFAULT_MACRO_FILE_NAME))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "key-scripter", "Key-Scripter").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
