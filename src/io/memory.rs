//! In-memory event sink

use crate::core::EventSink;
use crate::types::{SimError, SimEvent};
use std::sync::Mutex;

/// Keeps every recorded event, in arrival order
///
/// Arrival order is not commit order: events are recorded after locks are
/// released. Sort by sequence number (or use `LedgerReplay`) to recover
/// commit order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SimEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<SimEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SimEvent) -> Result<(), SimError> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
        Ok(())
    }
}
