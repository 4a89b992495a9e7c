//! Configuration data structures.
//!
//! All structs deny unknown fields and fall back to the values in
//! [`super::defaults`] for anything missing.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use novade_view_core::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// assert_eq!(config.level, "info");
/// assert_eq!(config.file_path, None);
/// assert_eq!(config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. `None` disables file logging.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Sizes used for server-side decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecorationConfig {
    #[serde(default = "defaults::default_border_width")]
    pub border_width: i32,
    #[serde(default = "defaults::default_titlebar_height")]
    pub titlebar_height: i32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        defaults::default_decoration_config()
    }
}

/// Placement and visual defaults for new views.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    /// Center newly mapped views on their output's usable area.
    #[serde(default = "defaults::default_true")]
    pub center_new_views: bool,
    /// Amount subtracted from a view's alpha on each `cycle_alpha`.
    #[serde(default = "defaults::default_alpha_step")]
    pub alpha_step: f32,
    /// Alpha below which `cycle_alpha` wraps back to fully opaque.
    #[serde(default = "defaults::default_min_alpha")]
    pub min_alpha: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        defaults::default_placement_config()
    }
}

/// Root configuration of the view core.
///
/// ```
/// use novade_view_core::config::ViewCoreConfig;
///
/// let config: ViewCoreConfig = toml::from_str(r#"
/// [decoration]
/// border_width = 2
/// "#).unwrap();
/// assert_eq!(config.decoration.border_width, 2);
/// assert_eq!(config.decoration.titlebar_height, 12);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewCoreConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub decoration: DecorationConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let config = ViewCoreConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.decoration.border_width, 4);
        assert_eq!(config.decoration.titlebar_height, 12);
        assert!(config.placement.center_new_views);
        assert_eq!(config.placement.alpha_step, 0.05);
        assert_eq!(config.placement.min_alpha, 0.1);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: ViewCoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewCoreConfig::default());
    }

    #[test]
    fn partial_sections_are_filled_in() {
        let config: ViewCoreConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"
            file_path = "/tmp/views.log"

            [placement]
            center_new_views = false
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file_path, Some(PathBuf::from("/tmp/views.log")));
        assert_eq!(config.logging.format, "text");
        assert!(!config.placement.center_new_views);
        assert_eq!(config.placement.alpha_step, 0.05);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ViewCoreConfig, _> = toml::from_str(
            r#"
            [decoration]
            border_colour = "red"
            "#,
        );
        assert!(result.is_err());
    }
}
