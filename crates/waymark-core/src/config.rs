//! Bookmark configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` fills missing fields from `Default::default()`,
//! so a config file only needs the keys it wants to change:
//!
//! ```toml
//! [bookmarks]
//! flash_duration_ms = 250
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bookmark behavior settings
    pub bookmarks: BookmarkConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default config: {}", err);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("waymark").join("config.toml"))
    }
}

/// Bookmark behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkConfig {
    /// Where bookmarks are persisted (defaults to the user data dir)
    pub storage_path: Option<PathBuf>,

    /// How long a jump target stays highlighted, in ms
    pub flash_duration_ms: u64,

    /// Re-apply saved bookmarks when a buffer opens
    pub restore_on_open: bool,
}

impl BookmarkConfig {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }

    /// Resolves the bookmark file path.
    pub fn storage_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("waymark").join("bookmarks.json"))
    }
}

impl Default for BookmarkConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            flash_duration_ms: 100,
            restore_on_open: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
