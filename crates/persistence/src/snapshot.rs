// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON snapshot of the whole in-memory store.
//!
//! Each request and interview is written as a flat record with its field
//! names preserved. Restoring a snapshot re-checks every invariant the live
//! stores enforce, plus the cross-store rule that each accepted request owns
//! exactly one confirmed interview copied from its consumed slot.

use crate::error::PersistenceError;
use crate::interviews::{InMemoryInterviewRegistry, InterviewRegistry};
use crate::outbox::{EventOutbox, InMemoryEventOutbox};
use crate::preferences::{InMemoryPreferenceStore, PreferenceStore};
use crate::requests::InMemoryRequestRepository;
use interview_negotiation_domain::{
    AvailabilityPreference, ConfirmedInterview, InterviewRequest, RequestStatus, SlotMode,
    TimeSlot,
};
use interview_negotiation_events::ResolutionEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Serializable image of every store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub requests: Vec<InterviewRequest>,
    pub interviews: Vec<ConfirmedInterview>,
    pub preferences: Vec<AvailabilityPreference>,
    #[serde(default)]
    pub pending_events: Vec<ResolutionEvent>,
}

impl StoreSnapshot {
    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON. The result is not yet validated; see
    /// `InMemoryStore::restore`.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the JSON does not match the snapshot shape.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    fn check_cross_store(&self) -> Result<(), PersistenceError> {
        let by_request: HashMap<&str, &ConfirmedInterview> = self
            .interviews
            .iter()
            .map(|record| (record.request_id.as_str(), record))
            .collect();

        for request in &self.requests {
            let record: Option<&&ConfirmedInterview> = by_request.get(request.id.as_str());
            match (request.status, record) {
                (RequestStatus::Accepted, Some(record)) => {
                    let Some(slot) = request
                        .consumed_slot()
                        .filter(|slot| slot.id == record.slot_id)
                    else {
                        return Err(PersistenceError::InvalidSnapshot(format!(
                            "interview '{}' does not reference the consumed slot of request '{}'",
                            record.id, request.id
                        )));
                    };
                    if let Some(field) = mismatched_field(request, slot, record) {
                        return Err(PersistenceError::InvalidSnapshot(format!(
                            "interview '{}' disagrees with request '{}' on {field}",
                            record.id, request.id
                        )));
                    }
                }
                (RequestStatus::Accepted, None) => {
                    return Err(PersistenceError::InvalidSnapshot(format!(
                        "accepted request '{}' has no confirmed interview",
                        request.id
                    )));
                }
                (RequestStatus::Pending | RequestStatus::Declined, Some(record)) => {
                    return Err(PersistenceError::InvalidSnapshot(format!(
                        "interview '{}' references unaccepted request '{}'",
                        record.id, request.id
                    )));
                }
                (RequestStatus::Pending | RequestStatus::Declined, None) => {}
            }
        }

        if let Some(orphan) = self.interviews.iter().find(|record| {
            !self
                .requests
                .iter()
                .any(|request| request.id == record.request_id)
        }) {
            return Err(PersistenceError::InvalidSnapshot(format!(
                "interview '{}' references unknown request '{}'",
                orphan.id, orphan.request_id
            )));
        }

        Ok(())
    }
}

/// First field in which an interview differs from the request and consumed
/// slot it was derived from. Only video interviews carry a meeting reference.
fn mismatched_field(
    request: &InterviewRequest,
    slot: &TimeSlot,
    record: &ConfirmedInterview,
) -> Option<&'static str> {
    let checks: [(&'static str, bool); 9] = [
        ("proposer_id", record.proposer_id == request.proposer_id),
        ("responder_id", record.responder_id == request.responder_id),
        ("job_title", record.job_title == request.job_title),
        ("date", record.date == slot.date),
        ("time", record.time == slot.time),
        (
            "duration_minutes",
            record.duration_minutes == slot.duration_minutes,
        ),
        ("mode", record.mode == slot.mode),
        (
            "location",
            record.location.as_deref() == slot.trimmed_location(),
        ),
        (
            "meeting_reference",
            record.meeting_reference.is_some() == (slot.mode == SlotMode::Video),
        ),
    ];
    checks
        .into_iter()
        .find(|(_, matches)| !matches)
        .map(|(field, _)| field)
}

/// The in-process stores, bundled for wiring into an engine.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    pub requests: Arc<InMemoryRequestRepository>,
    pub interviews: Arc<InMemoryInterviewRegistry>,
    pub preferences: Arc<InMemoryPreferenceStore>,
    pub outbox: Arc<InMemoryEventOutbox>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current contents of every store.
    ///
    /// Stores are read one after another, so a snapshot taken while writers
    /// are active may straddle a transition.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if any store cannot be read.
    pub fn snapshot(&self) -> Result<StoreSnapshot, PersistenceError> {
        Ok(StoreSnapshot {
            requests: self.requests.all()?,
            interviews: self.interviews.all()?,
            preferences: self.preferences.all()?,
            pending_events: self.outbox.pending()?,
        })
    }

    /// Builds fresh stores from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAggregate`, `InvalidSnapshot`, or a duplicate error if
    /// the snapshot breaks any store invariant.
    pub fn restore(snapshot: StoreSnapshot) -> Result<Self, PersistenceError> {
        snapshot.check_cross_store()?;

        let store: Self = Self::new();
        let request_count: usize = snapshot.requests.len();
        let interview_count: usize = snapshot.interviews.len();

        for request in snapshot.requests {
            store.requests.restore(request)?;
        }
        for record in snapshot.interviews {
            store.interviews.add(record)?;
        }
        for preference in snapshot.preferences {
            let validated: AvailabilityPreference = AvailabilityPreference::new(
                preference.responder_id.clone(),
                preference.preferred_days.clone(),
                preference.preferred_time_bands.clone(),
                preference.timezone(),
            )?;
            store
                .preferences
                .set(&preference.responder_id, validated)?;
        }
        for event in snapshot.pending_events {
            store.outbox.enqueue(event)?;
        }

        info!(
            requests = request_count,
            interviews = interview_count,
            "Restored store from snapshot"
        );
        Ok(store)
    }
}
