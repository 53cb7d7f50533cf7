// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ResolutionEvent;
use std::sync::Mutex;
use tracing::info;

/// Failure reported by a sink when it could not take an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The downstream consumer is temporarily unavailable.
    #[error("notification sink unavailable: {0}")]
    Unavailable(String),
    /// The event was refused and should not be retried.
    #[error("notification sink rejected event {event_id}: {reason}")]
    Rejected {
        /// The refused event.
        event_id: String,
        /// Why it was refused.
        reason: String,
    },
}

/// Receives resolution events after a successful resolve.
///
/// Delivery is at-least-once: the same event may be offered again after a
/// failure or a redelivery pass.
pub trait NotificationSink: Send + Sync {
    /// Offers one event to the sink.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the event was not taken.
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError>;
}

/// Sink that only writes a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError> {
        info!(
            event_id = %event.event_id,
            kind = %event.kind,
            request_id = %event.request_id,
            responder_id = %event.responder_id,
            proposer_id = %event.proposer_id,
            confirmed_interview_id = ?event.confirmed_interview_id,
            "Resolution event"
        );
        Ok(())
    }
}

/// In-memory sink that keeps every delivered event.
///
/// Hosts use it as a simple inbox; tests use it to observe emissions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event received so far, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events received, counting redeliveries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| SinkError::Unavailable(String::from("recording sink lock poisoned")))?;
        events.push(event.clone());
        Ok(())
    }
}
