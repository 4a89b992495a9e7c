//! Configuration management for the view core.
//!
//! - [`types`]: the [`ViewCoreConfig`] schema and its sections.
//! - [`defaults`]: default values used by serde for missing fields.
//! - [`loader`]: [`ConfigLoader`], which reads TOML and validates the result.

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{DecorationConfig, LoggingConfig, PlacementConfig, ViewCoreConfig};
