//! User configuration and preferences

use crate::error::{ImgsortError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Preferences read at startup. Command-line flags take precedence.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Color scheme name from colorschemes.json
    pub theme: Option<String>,
    /// Viewer command line; the image path is appended
    pub preview_command: Option<String>,
    pub preview_timeout_secs: Option<u64>,
    /// Where safe-deleted files go
    pub trash_dir: Option<PathBuf>,
    pub scroll_margin: Option<usize>,
}

impl UserConfig {
    /// `~/.config/imgsort` on Linux
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imgsort"))
    }

    /// Get the config file path (~/.config/imgsort/config.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load config from file, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            ImgsortError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            ImgsortError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ImgsortError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }
}
