//! Non-production audit sinks shipped for tests and examples.

use std::sync::Mutex;

use capgate_authority::{AuditEvent, AuditSink};

/// In-memory [`AuditSink`] that appends every event to a `Vec` behind a
/// mutex. Suitable for tests and short-lived examples; a production
/// deployment wires a durable, append-only sink instead.
#[derive(Default)]
pub struct VecAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl VecAuditSink {
    /// Build an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the events recorded so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }
}

impl AuditSink for VecAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
