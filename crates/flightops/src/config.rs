//! Configuration management for flightops.
//!
//! Configuration is loaded with figment from defaults, an optional TOML
//! file, and `FLIGHTOPS_`-prefixed environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightops";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "flightops.db";

/// Default shell history file name.
const HISTORY_FILE_NAME: &str = "history.txt";

/// Application configuration.
///
/// Precedence, highest first:
/// 1. Environment variables (prefixed with `FLIGHTOPS_`, e.g. `FLIGHTOPS_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/flightops/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Terminal interface configuration.
    pub interface: InterfaceConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/flightops/flightops.db`
    pub database_path: Option<PathBuf>,
    /// Load the demo fleet, airports, pilots and flights into a database
    /// that was just created.
    pub seed_on_create: bool,
}

/// How tables are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Box-drawing characters with rounded corners.
    #[default]
    Rounded,
    /// Plain ASCII borders.
    Ascii,
    /// Markdown pipe tables.
    Markdown,
}

/// Terminal interface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// Table border style.
    pub table_style: TableStyle,
    /// Number of shell history entries to keep.
    pub history_size: usize,
    /// Shell history file.
    /// Defaults to `~/.local/share/flightops/history.txt`
    pub history_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_on_create: true,
        }
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            table_style: TableStyle::Rounded,
            history_size: 500,
            history_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTOPS_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.interface.history_size == 0 {
            return Err(Error::ConfigValidation {
                message: "history_size must be greater than 0".to_string(),
            });
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the shell history path, resolving defaults if not set.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.interface
            .history_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(HISTORY_FILE_NAME))
    }
}
