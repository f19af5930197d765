//! Port for the structured invocation transcript.
//!
//! Defines the [`ConversationLogger`] trait for recording what was sent to
//! which model and how each call ended (attempts, status, timings).
//!
//! This is separate from `tracing`-based diagnostics: tracing handles
//! human-readable messages, while this port captures a machine-readable
//! transcript (JSONL).

use serde_json::Value;

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "invocation_result", "fan_out_complete").
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

/// Port for logging transcript events.
///
/// `log` is synchronous and infallible: a broken transcript must never fail
/// a model call, so implementations swallow their own errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
