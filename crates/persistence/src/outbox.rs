// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbox of resolution events awaiting delivery.
//!
//! An event is enqueued in the same critical section that commits the
//! resolution, and removed only once a sink has taken it.

use crate::error::PersistenceError;
use interview_negotiation_events::ResolutionEvent;
use std::sync::Mutex;

/// Holds events that have not yet been acknowledged by a sink.
pub trait EventOutbox: Send + Sync {
    /// Records an event for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox cannot be written.
    fn enqueue(&self, event: ResolutionEvent) -> Result<(), PersistenceError>;

    /// Removes a delivered event. Unknown ids are ignored, so acknowledging
    /// twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox cannot be written.
    fn acknowledge(&self, event_id: &str) -> Result<(), PersistenceError>;

    /// Events still awaiting delivery, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox cannot be read.
    fn pending(&self) -> Result<Vec<ResolutionEvent>, PersistenceError>;
}

/// In-process `EventOutbox`.
#[derive(Debug, Default)]
pub struct InMemoryEventOutbox {
    queue: Mutex<Vec<ResolutionEvent>>,
}

impl InMemoryEventOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<ResolutionEvent>>, PersistenceError> {
        self.queue
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned("outbox"))
    }
}

impl EventOutbox for InMemoryEventOutbox {
    fn enqueue(&self, event: ResolutionEvent) -> Result<(), PersistenceError> {
        self.lock()?.push(event);
        Ok(())
    }

    fn acknowledge(&self, event_id: &str) -> Result<(), PersistenceError> {
        self.lock()?.retain(|event| event.event_id != event_id);
        Ok(())
    }

    fn pending(&self) -> Result<Vec<ResolutionEvent>, PersistenceError> {
        Ok(self.lock()?.clone())
    }
}
