//! Default configuration values.
//!
//! These functions back the `#[serde(default = "...")]` attributes in
//! [`super::types`].

use std::path::PathBuf;

use super::types::{DecorationConfig, LoggingConfig, PlacementConfig};

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Border width applied to server-side decorated views.
pub(crate) fn default_border_width() -> i32 {
    4
}

/// Titlebar height applied to server-side decorated views.
pub(crate) fn default_titlebar_height() -> i32 {
    12
}

pub(crate) fn default_decoration_config() -> DecorationConfig {
    DecorationConfig {
        border_width: default_border_width(),
        titlebar_height: default_titlebar_height(),
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_alpha_step() -> f32 {
    0.05
}

pub(crate) fn default_min_alpha() -> f32 {
    0.1
}

pub(crate) fn default_placement_config() -> PlacementConfig {
    PlacementConfig {
        center_new_views: default_true(),
        alpha_step: default_alpha_step(),
        min_alpha: default_min_alpha(),
    }
}
