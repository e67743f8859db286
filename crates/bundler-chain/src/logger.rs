use std::sync::{Mutex, PoisonError};

/// Logger the host exposes to plugins for user-facing messages.
pub trait HostLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards host messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl HostLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "bundler", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "bundler", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "bundler", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Records every message in memory. Used by tests to inspect output.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    /// Number of recorded messages containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|record| record.message.contains(needle))
            .count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.count_containing(needle) > 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.lock().push(LogRecord {
            level,
            message: message.to_string(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
