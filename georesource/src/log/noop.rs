//! Logger that discards all messages.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// A logger that discards all messages.
///
/// Default for registries built in tests that don't care about log output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}
