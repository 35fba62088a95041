//! Recording doubles for the sleeper and audit collaborators.

use parking_lot::Mutex;
use propdb_core::{AuditHandler, Sleeper};
use propdb_document::Value;
use std::time::Duration;

/// A sleeper that records every requested nap instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded nap, in order.
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().clone()
    }

    /// Total time that would have been slept.
    pub fn total(&self) -> Duration {
        self.naps.lock().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.naps.lock().push(duration);
    }
}

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// The property that changed.
    pub property: String,
    /// The committed value; `Value::Null` for a removal.
    pub new_value: Value,
    /// Identity of the owning entity.
    pub owner_id: String,
}

/// An audit handler that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingAuditHandler {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditHandler {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded event, in order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditHandler for RecordingAuditHandler {
    fn on_property_changed(&self, property: &str, new_value: &Value, owner_id: &str) {
        self.events.lock().push(AuditEvent {
            property: property.to_string(),
            new_value: new_value.clone(),
            owner_id: owner_id.to_string(),
        });
    }
}
