//! Port for structured flow logging.
//!
//! Defines the [`ConversationLogger`] trait for recording flow events
//! (capability invoked, succeeded, failed) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures every model
//! interaction in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured flow event for logging.
pub struct ConversationEvent {
    /// Event type identifier (`flow_invoked`, `flow_succeeded`, `flow_failed`).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging flow events to a structured log.
///
/// `log` is synchronous and infallible; logging failures never reach the
/// caller.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
