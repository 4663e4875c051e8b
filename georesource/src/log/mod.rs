//! Logging abstraction used by the registry and its collaborators.
//!
//! Components receive an `Arc<dyn Logger>` instead of calling `tracing`
//! directly, so tests can assert on what the registry reported (for example
//! the warning emitted when `all()` is called before `init()`).
//!
//! - [`TracingLogger`]: production adapter, forwards to `tracing`
//! - [`NoOpLogger`]: discards everything
//! - [`RecordingLogger`]: keeps records in memory for assertions
//!
//! ```
//! use georesource::log::{Logger, RecordingLogger, LogLevel};
//! use georesource::log_warn;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(RecordingLogger::new());
//! log_warn!(logger, "GeoResource {} not found", "atkis");
//! assert_eq!(logger.count(LogLevel::Warn), 1);
//! ```

mod noop;
mod recording;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use recording::RecordingLogger;
pub use tracing_adapter::TracingLogger;
