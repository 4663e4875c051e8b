//! In-memory logger for assertions in tests.

use crate::log::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// Logger that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all records in emission order.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    /// Number of records at exactly `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    /// Returns true if any record at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.records.lock().push((level, args.to_string()));
    }
}
