use crate::domain::ports::LogSink;
use tracing::Level;

/// Forwards gateway diagnostics to `tracing` under the
/// `paygate::diagnostics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingLogSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "paygate::diagnostics", "{}", message),
            Level::WARN => tracing::warn!(target: "paygate::diagnostics", "{}", message),
            Level::INFO => tracing::info!(target: "paygate::diagnostics", "{}", message),
            Level::DEBUG => tracing::debug!(target: "paygate::diagnostics", "{}", message),
            _ => tracing::trace!(target: "paygate::diagnostics", "{}", message),
        }
    }
}
