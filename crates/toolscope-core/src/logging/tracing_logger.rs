//! Logger that forwards to `tracing`

use super::traits::Logger;

/// Forwards every message to the `tracing` macros.
///
/// Messages keep the `[Component]` prefix the crate writes; the bracketed
/// component is also attached as a `component` field so subscribers can
/// filter on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger
    pub fn new() -> Self {
        Self
    }
}

/// Extract `Component` from a message shaped like `[Component] text`.
fn component(message: &str) -> &str {
    message
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(name, _)| name)
        .unwrap_or("toolscope")
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(component = component(message), "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(component = component(message), "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = component(message), "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = component(message), "{}", message);
    }
}
