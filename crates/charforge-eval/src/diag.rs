//! Text-diagnostic sink for soft data misses.
//!
//! Once a formula has passed its semantics check, evaluation must always
//! complete with a well-typed value; a missing column or row is reported here
//! and replaced by the result format's default, never turned into an error.

use std::sync::Mutex;

pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: forwards to `tracing` at WARN level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "charforge::eval", "{message}");
    }
}

/// Sink that retains every message, for assertions in tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
