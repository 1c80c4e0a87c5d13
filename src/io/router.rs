//! Fan-out of events to the transcript and the flagged log

use crate::core::EventSink;
use crate::types::{SimError, SimEvent};
use std::sync::Arc;

/// Sends every event to the transcript and flagged events to the flagged log
///
/// Both sinks are always attempted; the first failure is returned.
pub struct EventRouter {
    transcript: Arc<dyn EventSink>,
    flagged: Option<Arc<dyn EventSink>>,
}

impl EventRouter {
    pub fn new(transcript: Arc<dyn EventSink>, flagged: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            transcript,
            flagged,
        }
    }
}

impl EventSink for EventRouter {
    fn record(&self, event: &SimEvent) -> Result<(), SimError> {
        let transcript = self.transcript.record(event);
        let flagged = match &self.flagged {
            Some(sink) if event.is_flagged() => sink.record(event),
            _ => Ok(()),
        };
        transcript.and(flagged)
    }
}
