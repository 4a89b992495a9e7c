//! Logging setup for the view core.
//!
//! Built on `tracing`: a stdout layer (text or JSON) plus an optional
//! daily-rolling file layer. The compositor binary calls [`init_logging`] once
//! its configuration is loaded; tests and early startup use
//! [`init_minimal_logging`].

use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::LoggingError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the file writer alive so buffered lines are flushed on shutdown.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs an `EnvFilter`-driven subscriber writing to stderr.
///
/// Defaults to `info` when `RUST_LOG` is unset. Does nothing if a global
/// subscriber is already installed.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn level_filter(level: &str) -> Result<String, LoggingError> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        invalid => {
            return Err(LoggingError::InitializationFailure(format!(
                "Invalid log level in config: {}",
                invalid
            )))
        }
    };
    Ok(level.to_string())
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), LoggingError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(|e| {
        LoggingError::InitializationFailure(format!(
            "Cannot create log directory {}: {}",
            directory.display(),
            e
        ))
    })?;
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("view-core.log"));

    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = match format {
        "json" => fmt::layer().json().with_writer(writer).with_ansi(false).boxed(),
        _ => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
    };
    Ok((layer, guard))
}

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, a subscriber that is already installed is not an
/// error; the file guard is still replaced so a changed `file_path` takes
/// effect for the new writer.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), LoggingError> {
    let level = level_filter(&config.level)?;
    let format = config.format.to_lowercase();

    let stdout_layer = match format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.clone()))
            .boxed(),
        _ => fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level.clone()))
            .boxed(),
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut file_guard = None;
    if let Some(path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(path, &format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level)).boxed());
        file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    if let Ok(mut slot) = LOG_WORKER_GUARD.lock() {
        *slot = file_guard;
    }

    match result {
        Ok(()) => Ok(()),
        Err(_) if is_reload => Ok(()),
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_logging_can_run_twice() {
        init_minimal_logging();
        init_minimal_logging();
        tracing::info!("minimal logging installed");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config, false),
            Err(LoggingError::InitializationFailure(_))
        ));
    }

    #[test]
    fn file_layer_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/views.log");
        let (_layer, _guard) = create_file_layer(&path, "json").unwrap();
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn reload_tolerates_existing_subscriber() {
        init_minimal_logging();
        let config = LoggingConfig::default();
        assert!(init_logging(&config, true).is_ok());
    }
}
