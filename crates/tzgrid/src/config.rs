//! Configuration management for tzgrid.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "tzgrid";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TZGRID_`)
/// 2. TOML config file at `~/.config/tzgrid/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database image configuration.
    pub database: DatabaseConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Where the timezone database image lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to a dump of the flash chip holding the database.
    pub image_path: Option<PathBuf>,
    /// Byte address of the database header within the image.
    pub base_address: u64,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print results as JSON by default.
    pub json: bool,
    /// Decimal places used when echoing coordinates.
    /// Unset prints them as given.
    pub precision: Option<usize>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TZGRID_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.database.image_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "database.image_path must not be empty".to_string(),
                });
            }
        }

        if let Some(precision) = self.output.precision {
            if precision > 12 {
                return Err(Error::ConfigValidation {
                    message: format!("output.precision ({precision}) cannot exceed 12"),
                });
            }
        }

        Ok(())
    }

    /// Format a coordinate for display using the configured precision.
    #[must_use]
    pub fn format_coordinate(&self, value: f64) -> String {
        match self.output.precision {
            Some(places) => format!("{value:.places$}"),
            None => value.to_string(),
        }
    }
}
