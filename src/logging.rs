//! Pipeline log sink.
//!
//! The commit pipeline reports progress through a [`PipelineLogger`] handed in
//! by the caller, so a tool host can route messages to its own channel.

use std::sync::Mutex;

use tracing::{debug, error, info, warn};

/// Four-level log sink used by [`crate::generate_with`].
pub trait PipelineLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to `tracing` under the `commitwise::pipeline` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PipelineLogger for TracingLogger {
    fn debug(&self, message: &str) {
        debug!(target: "commitwise::pipeline", "{message}");
    }

    fn info(&self, message: &str) {
        info!(target: "commitwise::pipeline", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "commitwise::pipeline", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "commitwise::pipeline", "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl PipelineLogger for NullLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Severity of a captured log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Keeps every message in memory, for hosts that return logs with the result.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured messages in arrival order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl PipelineLogger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
