//! Configuration loading and validation.
//!
//! [`ConfigLoader`] parses a TOML document into a [`ViewCoreConfig`] and
//! normalizes it. A missing file is not an error: defaults are used instead.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::ViewCoreConfig;
use crate::error::ConfigError;

/// Namespace for the configuration loading functions.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads and validates the configuration file at `path`.
    ///
    /// Returns the default configuration if the file does not exist or is empty.
    pub fn load_from_path(path: &Path) -> Result<ViewCoreConfig, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No configuration file found, using defaults");
                return Ok(ViewCoreConfig::default());
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<ViewCoreConfig, ConfigError> {
        let config: ViewCoreConfig = if content.trim().is_empty() {
            ViewCoreConfig::default()
        } else {
            toml::from_str(content)?
        };
        Self::validate_config(config)
    }

    /// Normalizes case-insensitive strings and rejects out-of-range values.
    pub fn validate_config(mut config: ViewCoreConfig) -> Result<ViewCoreConfig, ConfigError> {
        config.logging.level = config.logging.level.to_lowercase();
        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}",
                    other
                )))
            }
        }

        config.logging.format = config.logging.format.to_lowercase();
        if config.logging.format != "text" && config.logging.format != "json" {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log format: {}",
                config.logging.format
            )));
        }

        if config.decoration.border_width < 0 || config.decoration.titlebar_height < 0 {
            return Err(ConfigError::ValidationError(
                "Decoration sizes must not be negative".to_string(),
            ));
        }

        let placement = &config.placement;
        if !(placement.alpha_step > 0.0) {
            return Err(ConfigError::ValidationError(
                "alpha_step must be positive".to_string(),
            ));
        }
        if !(placement.min_alpha > 0.0 && placement.min_alpha <= 1.0) {
            return Err(ConfigError::ValidationError(
                "min_alpha must be in (0, 1]".to_string(),
            ));
        }

        Ok(config)
    }
}
