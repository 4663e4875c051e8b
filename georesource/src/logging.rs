//! Host-side logging setup.
//!
//! The registry only talks to the [`Logger`](crate::log::Logger) trait. Hosts
//! that use [`TracingLogger`](crate::log::TracingLogger) call
//! [`init_logging`] once at startup to install a `tracing` subscriber:
//! - stdout output, filtered by `RUST_LOG` (falls back to the configured filter)
//! - optional file output under a log directory, cleared on start

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "georesource=info";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "georesource.log";

/// Logging configuration.
///
/// ```
/// use georesource::logging::LoggingConfig;
///
/// let config = LoggingConfig::new()
///     .with_filter("georesource=debug")
///     .with_log_dir("logs");
/// assert_eq!(config.filter(), "georesource=debug");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    filter: String,
    log_dir: Option<PathBuf>,
    log_file: String,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Also write logs to `<dir>/<log_file>`.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_log_file(mut self, file: impl Into<String>) -> Self {
        self.log_file = file.into();
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            log_dir: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the file writer, if any.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error if the log directory cannot be prepared, or if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, io::Error> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter()));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(true);

    let (file_layer, file_guard) = match config.log_dir() {
        Some(dir) => {
            prepare_log_file(dir, config.log_file())?;
            let appender = tracing_appender::rolling::never(dir, config.log_file());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the log directory and truncate the log file.
pub fn prepare_log_file(dir: &Path, file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file);
    fs::write(&path, "")?;
    Ok(path)
}
