//! Shared handles passed to every agent and auditor

use super::bank::Bank;
use super::traits::{EventSink, RandomSource};
use crate::config::SimConfig;
use crate::types::{EventKind, SimEvent};
use log::error;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything a running agent needs, cheaply cloneable
///
/// There is no process-wide state: the bank, the collaborators and the
/// configuration all travel through this struct.
#[derive(Clone)]
pub struct SimContext {
    pub bank: Arc<Bank>,
    pub random: Arc<dyn RandomSource>,
    pub sink: Arc<dyn EventSink>,
    pub config: Arc<SimConfig>,
}

impl SimContext {
    pub fn new(
        bank: Arc<Bank>,
        random: Arc<dyn RandomSource>,
        sink: Arc<dyn EventSink>,
        config: Arc<SimConfig>,
    ) -> Self {
        Self {
            bank,
            random,
            sink,
            config,
        }
    }

    /// Stamp and record an event
    ///
    /// Sink failures are reported on the log and otherwise ignored: the
    /// transaction behind the event has already committed.
    pub fn emit(&self, kind: EventKind) -> SimEvent {
        let event = SimEvent::now(kind);
        if let Err(e) = self.sink.record(&event) {
            error!("failed to record event {:?}: {}", event.kind, e);
        }
        event
    }

    /// Sleep for a random pause below `max`
    ///
    /// Returns `false` if `cancel` fired first.
    pub async fn pause(&self, max: Duration, cancel: &CancellationToken) -> bool {
        let pause = self.random.jitter(max);
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(pause) => true,
        }
    }
}
