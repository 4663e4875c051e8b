//! Tracing library adapter.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Events are emitted under the `georesource` target so hosts can filter
/// them with `RUST_LOG=georesource=debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "georesource", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "georesource", "{}", args),
            LogLevel::Info => tracing::info!(target: "georesource", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "georesource", "{}", args),
            LogLevel::Error => tracing::error!(target: "georesource", "{}", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingLogger>();
    }

    #[test]
    fn test_tracing_logger_as_trait_object() {
        // No subscriber installed; events are dropped.
        let logger: Box<dyn Logger> = Box::new(TracingLogger::new());
        logger.info(format_args!("loaded {} GeoResources", 3));
        logger.debug(format_args!("strategy declined id"));
    }
}
