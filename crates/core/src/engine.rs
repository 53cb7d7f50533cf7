// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The negotiation engine.
//!
//! The engine owns the request lifecycle: it creates pending requests,
//! resolves them exactly once, derives confirmed interviews and hands
//! resolution events to the notification sink.
//!
//! # Exclusivity
//!
//! Every resolution of a request runs under that request's lock, and the
//! request write is a compare-and-swap against `pending`. Of any number of
//! concurrent resolutions for one request, exactly one commits; the rest
//! observe `AlreadyResolved`.
//!
//! An accept registers its interview before the request write and queues
//! its event after it. If a later step fails the earlier ones are undone,
//! so an accepted request always owns its interview and has queued its
//! event.

use crate::apply::{apply_resolution, confirm_interview};
use crate::command::{NewRequest, ResolveAction};
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::locks::RequestLocks;
use crate::ports::{Clock, IdSource, RandomIdSource, SystemClock};
use crate::propose::{Schedulable, propose_slots};
use interview_negotiation_domain::{
    AvailabilityPreference, ConfirmedInterview, InterviewId, InterviewRequest, RequestId,
    RequestStatus, SlotId, SlotMode, TimeSlot, UserId, validate_request_fields,
};
use interview_negotiation_events::{NotificationSink, ResolutionEvent, SinkError};
use interview_negotiation_persistence::{
    EventOutbox, InMemoryStore, InterviewRegistry, PreferenceStore, RequestRepository,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The stores an engine reads and writes.
#[derive(Clone)]
pub struct Stores {
    pub requests: Arc<dyn RequestRepository>,
    pub interviews: Arc<dyn InterviewRegistry>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub outbox: Arc<dyn EventOutbox>,
}

impl From<&InMemoryStore> for Stores {
    fn from(store: &InMemoryStore) -> Self {
        Self {
            requests: store.requests.clone(),
            interviews: store.interviews.clone(),
            preferences: store.preferences.clone(),
            outbox: store.outbox.clone(),
        }
    }
}

/// What a successful `resolve` committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    /// The request as stored after resolution.
    pub request: InterviewRequest,
    /// The derived interview; `None` for a decline.
    pub confirmed: Option<ConfirmedInterview>,
    /// The event recorded for the notification sink.
    pub event: ResolutionEvent,
    /// Whether the sink took the event during this call. Undelivered events
    /// stay in the outbox for `redeliver_pending`.
    pub delivered: bool,
}

/// Coordinates requests, confirmed interviews, preferences and notifications.
pub struct NegotiationEngine {
    stores: Stores,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    config: EngineConfig,
    locks: RequestLocks,
}

impl NegotiationEngine {
    /// Creates an engine with the system clock and random identifiers.
    #[must_use]
    pub fn new(stores: Stores, sink: Arc<dyn NotificationSink>, config: EngineConfig) -> Self {
        Self {
            stores,
            sink,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIdSource),
            config,
            locks: RequestLocks::new(),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_source(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens a negotiation: stores a pending request with every slot open.
    ///
    /// Slots without an id get one from the identifier source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if a party id or the job title is blank, the
    /// bundle is empty, slot ids repeat, an in-person slot has no location,
    /// or a slot has no duration.
    pub fn create_request(&self, new_request: NewRequest) -> Result<RequestId, CoreError> {
        let NewRequest {
            proposer_id,
            responder_id,
            job_title,
            message,
            slots,
        } = new_request;

        validate_request_fields(&proposer_id, &responder_id, &job_title)?;

        let slots: Vec<TimeSlot> = slots
            .into_iter()
            .map(|draft| {
                let id: SlotId = draft
                    .id
                    .clone()
                    .unwrap_or_else(|| self.ids.next_slot_id());
                TimeSlot::open(id, draft)
            })
            .collect();

        let request: InterviewRequest = InterviewRequest::pending(
            self.ids.next_request_id(),
            proposer_id,
            responder_id,
            job_title.trim().to_string(),
            message.filter(|text| !text.trim().is_empty()),
            self.clock.now(),
            slots,
        );

        let proposer: UserId = request.proposer_id.clone();
        let responder: UserId = request.responder_id.clone();
        let slot_count: usize = request.slots.len();
        let id: RequestId = self.stores.requests.create(request).inspect_err(|err| {
            debug!(proposer_id = %proposer, error = %err, "Rejected interview request");
        })?;

        info!(
            request_id = %id,
            proposer_id = %proposer,
            responder_id = %responder,
            slot_count,
            "Created interview request"
        );
        Ok(id)
    }

    /// Resolves a pending request by accepting one slot or declining the bundle.
    ///
    /// On accept, the named slot is consumed, its siblings voided, and a
    /// confirmed interview is registered. On decline every slot is voided.
    /// Either way a resolution event is recorded and offered to the sink.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist
    /// - `AlreadyResolved` if the request is no longer pending
    /// - `UnknownSlot` if the slot is not in the bundle or not open
    /// - `DuplicateSlot` if a confirmed interview already exists (a defect)
    pub fn resolve(
        &self,
        request_id: &RequestId,
        slot_id: &SlotId,
        action: ResolveAction,
    ) -> Result<ResolutionOutcome, CoreError> {
        let committed = self
            .locks
            .with_lock(request_id, || self.commit_resolution(request_id, slot_id, action));

        let mut outcome: ResolutionOutcome = match committed {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.is_recoverable() {
                    debug!(request_id = %request_id, slot_id = %slot_id, %action, error = %err, "Resolution rejected");
                } else {
                    error!(request_id = %request_id, slot_id = %slot_id, %action, error = %err, "Resolution failed");
                }
                return Err(err);
            }
        };

        info!(
            request_id = %outcome.request.id,
            status = %outcome.request.status,
            slot_id = %slot_id,
            confirmed_interview_id = ?outcome.confirmed.as_ref().map(|record| &record.id),
            "Resolved interview request"
        );

        outcome.delivered = self.deliver(&outcome.event);
        Ok(outcome)
    }

    /// Runs inside the request lock: validate, derive, register, persist, enqueue.
    fn commit_resolution(
        &self,
        request_id: &RequestId,
        slot_id: &SlotId,
        action: ResolveAction,
    ) -> Result<ResolutionOutcome, CoreError> {
        let current: InterviewRequest = self.stores.requests.get(request_id)?;
        let resolved: InterviewRequest = apply_resolution(&current, slot_id, action)?;
        let now = self.clock.now();

        let confirmed: Option<ConfirmedInterview> = match action {
            ResolveAction::Accept => resolved.slot(slot_id).map(|slot| {
                let meeting_reference: Option<String> = (slot.mode == SlotMode::Video)
                    .then(|| self.config.meeting_reference(&self.ids.meeting_token()));
                confirm_interview(
                    &resolved,
                    slot,
                    self.ids.next_interview_id(),
                    now,
                    meeting_reference,
                )
            }),
            ResolveAction::Decline => None,
        };

        let event: ResolutionEvent = match &confirmed {
            Some(record) => ResolutionEvent::accepted(
                self.ids.next_event_id(),
                resolved.id.clone(),
                resolved.responder_id.clone(),
                resolved.proposer_id.clone(),
                now,
                record.id.clone(),
            ),
            None => ResolutionEvent::declined(
                self.ids.next_event_id(),
                resolved.id.clone(),
                resolved.responder_id.clone(),
                resolved.proposer_id.clone(),
                now,
            ),
        };

        // Each step below undoes the ones before it on failure, so a failed
        // resolution leaves the request pending with nothing registered.
        if let Some(record) = &confirmed {
            self.stores.interviews.add(record.clone())?;
        }

        if let Err(err) = self
            .stores
            .requests
            .update(resolved.clone(), RequestStatus::Pending)
        {
            self.withdraw_interview(confirmed.as_ref());
            return Err(err.into());
        }

        if let Err(err) = self.stores.outbox.enqueue(event.clone()) {
            if let Err(revert_err) = self.stores.requests.revert(current, resolved.status) {
                error!(request_id = %resolved.id, error = %revert_err, "Could not revert request after outbox failure");
            }
            self.withdraw_interview(confirmed.as_ref());
            return Err(err.into());
        }

        Ok(ResolutionOutcome {
            request: resolved,
            confirmed,
            event,
            delivered: false,
        })
    }

    fn withdraw_interview(&self, confirmed: Option<&ConfirmedInterview>) {
        if let Some(record) = confirmed
            && let Err(err) = self.stores.interviews.remove(&record.id)
        {
            error!(interview_id = %record.id, request_id = %record.request_id, error = %err, "Could not withdraw interview of failed resolution");
        }
    }

    /// Offers an event to the sink, acknowledging it in the outbox on success.
    fn deliver(&self, event: &ResolutionEvent) -> bool {
        let attempts: u32 = self.config.max_delivery_attempts.max(1);
        for attempt in 1..=attempts {
            match self.sink.deliver(event) {
                Ok(()) => {
                    self.acknowledge(event);
                    return true;
                }
                Err(err @ SinkError::Rejected { .. }) => {
                    warn!(event_id = %event.event_id, error = %err, "Sink rejected event; dropping it");
                    self.acknowledge(event);
                    return false;
                }
                Err(err @ SinkError::Unavailable(_)) => {
                    warn!(event_id = %event.event_id, attempt, attempts, error = %err, "Event delivery failed");
                }
            }
        }
        false
    }

    fn acknowledge(&self, event: &ResolutionEvent) {
        if let Err(err) = self.stores.outbox.acknowledge(&event.event_id) {
            // The event stays pending and will be offered again.
            warn!(event_id = %event.event_id, error = %err, "Could not acknowledge event");
        }
    }

    /// Offers every undelivered event to the sink again.
    ///
    /// Returns the number of events the sink took.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the outbox cannot be read.
    pub fn redeliver_pending(&self) -> Result<usize, CoreError> {
        let pending: Vec<ResolutionEvent> = self.stores.outbox.pending()?;
        let total: usize = pending.len();
        let delivered: usize = pending.iter().filter(|event| self.deliver(event)).count();
        if total > 0 {
            info!(total, delivered, "Redelivered pending resolution events");
        }
        Ok(delivered)
    }

    /// Orders candidate slots for a responder by their stored preference.
    ///
    /// Advisory only: the result is a permutation of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the preference store cannot be read.
    pub fn propose_slots_for<T: Schedulable>(
        &self,
        responder_id: &UserId,
        candidates: Vec<T>,
    ) -> Result<Vec<T>, CoreError> {
        let preference: AvailabilityPreference = self.stores.preferences.get(responder_id)?;
        Ok(propose_slots(&preference, candidates))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the request does not exist.
    pub fn get_request(&self, request_id: &RequestId) -> Result<InterviewRequest, CoreError> {
        Ok(self.stores.requests.get(request_id)?)
    }

    /// Requests addressed to a responder, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the repository cannot be read.
    pub fn list_by_responder(
        &self,
        responder_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, CoreError> {
        Ok(self.stores.requests.list_by_responder(responder_id)?)
    }

    /// Requests issued by a proposer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the repository cannot be read.
    pub fn list_by_proposer(
        &self,
        proposer_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, CoreError> {
        Ok(self.stores.requests.list_by_proposer(proposer_id)?)
    }

    /// Requests still awaiting this responder's answer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the repository cannot be read.
    pub fn pending_for_responder(
        &self,
        responder_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, CoreError> {
        let mut requests: Vec<InterviewRequest> = self.list_by_responder(responder_id)?;
        requests.retain(InterviewRequest::is_pending);
        Ok(requests)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no interview has this id.
    pub fn get_confirmed_interview(
        &self,
        interview_id: &InterviewId,
    ) -> Result<ConfirmedInterview, CoreError> {
        Ok(self.stores.interviews.get(interview_id)?)
    }

    /// Upcoming-interview feed for a user on either side, earliest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the registry cannot be read.
    pub fn list_confirmed_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConfirmedInterview>, CoreError> {
        Ok(self.stores.interviews.list_by_user(user_id)?)
    }

    /// # Errors
    ///
    /// Returns `Storage` if the registry cannot be read.
    pub fn confirmed_for_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<ConfirmedInterview>, CoreError> {
        Ok(self.stores.interviews.find_by_request(request_id)?)
    }

    /// # Errors
    ///
    /// Returns `Storage` if the preference store cannot be read.
    pub fn get_preference(
        &self,
        responder_id: &UserId,
    ) -> Result<AvailabilityPreference, CoreError> {
        Ok(self.stores.preferences.get(responder_id)?)
    }

    /// Replaces a responder's preference wholesale.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the preference store cannot be written.
    pub fn set_preference(
        &self,
        responder_id: &UserId,
        preference: AvailabilityPreference,
    ) -> Result<(), CoreError> {
        self.stores.preferences.set(responder_id, preference)?;
        debug!(responder_id = %responder_id, "Updated availability preference");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn held_lock_count(&self) -> usize {
        self.locks.len()
    }
}
