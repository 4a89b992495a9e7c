//! Error handling for the view core.
//!
//! [`ViewCoreError`] is returned by the [`Desktop`](crate::desktop::Desktop)
//! operations that address objects by id. Client-driven events can destroy a
//! view or layer surface during any dispatch, so a stale id is reported as an
//! `Unknown*` variant instead of being dereferenced.
//!
//! Protocol-level anomalies are not errors here: backend-reported state that
//! contradicts local state is corrected in place, stale acknowledgments are
//! ignored and grab requests without a usable seat are dropped. Only
//! invariant violations (such as popup creation on a variant without popup
//! support) are fatal and panic.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{ChildId, LayerId, OutputId, ViewId, WorkspaceId};

/// Main error type of the view core.
#[derive(Debug, Error)]
pub enum ViewCoreError {
    /// The view was destroyed or never existed.
    #[error("Unknown view: {0}")]
    UnknownView(ViewId),

    /// The view child was destroyed or never existed.
    #[error("Unknown view child: {0}")]
    UnknownChild(ChildId),

    /// The output was destroyed or never existed.
    #[error("Unknown output: {0}")]
    UnknownOutput(OutputId),

    /// The layer surface was destroyed or never existed.
    #[error("Unknown layer surface: {0}")]
    UnknownLayer(LayerId),

    /// The workspace does not exist.
    #[error("Unknown workspace: {0}")]
    UnknownWorkspace(WorkspaceId),

    /// An operation needed an output but none is connected.
    #[error("No output available")]
    NoOutput,

    /// Wraps a [`ConfigError`].
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Wraps a [`LoggingError`].
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// General I/O errors not covered by other variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but holds invalid values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Logging initialization failed: {0}")]
    InitializationFailure(String),
}

/// Convenience alias used by the desktop operations.
pub type Result<T, E = ViewCoreError> = std::result::Result<T, E>;
