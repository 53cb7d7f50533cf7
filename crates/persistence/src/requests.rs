// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage of `InterviewRequest` aggregates.
//!
//! Aggregates are stored and replaced whole. The repository re-checks the
//! request invariants on every write so a malformed aggregate can never be
//! observed by readers.

use crate::error::PersistenceError;
use interview_negotiation_domain::{
    DomainError, InterviewRequest, RequestId, RequestStatus, UserId, validate_request_invariants,
};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Durable store of interview requests keyed by request id.
pub trait RequestRepository: Send + Sync {
    /// Stores a new pending request and returns its id.
    ///
    /// # Errors
    ///
    /// - `InvalidAggregate` if the bundle is empty, has duplicate slot ids,
    ///   an in-person slot lacks a location, or the request is not pending
    /// - `DuplicateRequest` if the id is already taken
    fn create(&self, request: InterviewRequest) -> Result<RequestId, PersistenceError>;

    /// Loads a request by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no request has this id.
    fn get(&self, id: &RequestId) -> Result<InterviewRequest, PersistenceError>;

    /// Requests addressed to a responder, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_by_responder(
        &self,
        responder_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, PersistenceError>;

    /// Requests issued by a proposer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_by_proposer(&self, proposer_id: &UserId)
    -> Result<Vec<InterviewRequest>, PersistenceError>;

    /// Replaces a stored aggregate, provided its stored status still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist
    /// - `StatusConflict` if the stored status is not `expected`
    /// - `BundleChanged` if the slot ids or their order differ
    /// - `InvalidAggregate` if the new aggregate breaks an invariant or the
    ///   status change is not a permitted transition
    fn update(
        &self,
        request: InterviewRequest,
        expected: RequestStatus,
    ) -> Result<(), PersistenceError>;

    /// Puts back the pending aggregate that a resolution replaced, when the
    /// rest of that resolution could not be recorded.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist
    /// - `StatusConflict` if the stored status is not `resolved`
    /// - `BundleChanged` if the slot ids or their order differ
    /// - `InvalidAggregate` if `previous` is not a valid pending aggregate
    fn revert(
        &self,
        previous: InterviewRequest,
        resolved: RequestStatus,
    ) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone)]
struct StoredRequest {
    /// Insertion order; breaks ties between equal `created_at` values.
    seq: u64,
    request: InterviewRequest,
}

#[derive(Debug, Default)]
struct RequestTable {
    rows: HashMap<RequestId, StoredRequest>,
    next_seq: u64,
}

impl RequestTable {
    fn insert(&mut self, request: InterviewRequest) -> Result<RequestId, PersistenceError> {
        if self.rows.contains_key(&request.id) {
            return Err(PersistenceError::DuplicateRequest(request.id.to_string()));
        }

        let id: RequestId = request.id.clone();
        let seq: u64 = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(id.clone(), StoredRequest { seq, request });
        Ok(id)
    }

    /// The stored row `request` may replace: same id, stored status equal to
    /// `expected`, same slot ids in the same order.
    fn replaceable(
        &mut self,
        request: &InterviewRequest,
        expected: RequestStatus,
    ) -> Result<&mut StoredRequest, PersistenceError> {
        let row: &mut StoredRequest =
            self.rows
                .get_mut(&request.id)
                .ok_or_else(|| PersistenceError::NotFound {
                    kind: "Request",
                    id: request.id.to_string(),
                })?;

        if row.request.status != expected {
            return Err(PersistenceError::StatusConflict {
                request_id: request.id.to_string(),
                expected,
                found: row.request.status,
            });
        }

        let same_bundle: bool = row.request.slots.len() == request.slots.len()
            && row
                .request
                .slots
                .iter()
                .zip(&request.slots)
                .all(|(old, new)| old.id == new.id);
        if !same_bundle {
            return Err(PersistenceError::BundleChanged(request.id.to_string()));
        }

        Ok(row)
    }

    fn sorted_where(&self, predicate: impl Fn(&InterviewRequest) -> bool) -> Vec<InterviewRequest> {
        let mut matched: Vec<&StoredRequest> = self
            .rows
            .values()
            .filter(|row| predicate(&row.request))
            .collect();
        matched.sort_by_key(|row| (row.request.created_at, row.seq));
        matched.into_iter().map(|row| row.request.clone()).collect()
    }
}

/// In-process `RequestRepository`.
///
/// Readers take a shared lock only long enough to clone the rows they return,
/// so a listing never blocks a writer for longer than that copy.
#[derive(Debug, Default)]
pub struct InMemoryRequestRepository {
    table: RwLock<RequestTable>,
}

impl InMemoryRequestRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an already-resolved aggregate, as when restoring a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAggregate` if the request breaks an invariant, or
    /// `DuplicateRequest` if the id is taken.
    pub fn restore(&self, request: InterviewRequest) -> Result<(), PersistenceError> {
        validate_request_invariants(&request)?;
        self.write()?.insert(request)?;
        Ok(())
    }

    /// Every stored request in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if the store cannot be read.
    pub fn all(&self) -> Result<Vec<InterviewRequest>, PersistenceError> {
        let table = self.read()?;
        let mut rows: Vec<&StoredRequest> = table.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().map(|row| row.request.clone()).collect())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, RequestTable>, PersistenceError> {
        self.table
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("requests"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, RequestTable>, PersistenceError> {
        self.table
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("requests"))
    }
}

impl RequestRepository for InMemoryRequestRepository {
    fn create(&self, request: InterviewRequest) -> Result<RequestId, PersistenceError> {
        validate_request_invariants(&request)?;
        if !request.is_pending() {
            return Err(PersistenceError::InvalidAggregate(
                DomainError::InconsistentSlotStates {
                    request_id: request.id.to_string(),
                    reason: format!("new request must be pending, got '{}'", request.status),
                },
            ));
        }

        let slot_count: usize = request.slots.len();
        let id: RequestId = self.write()?.insert(request)?;
        debug!(request_id = %id, slot_count, "Stored new interview request");
        Ok(id)
    }

    fn get(&self, id: &RequestId) -> Result<InterviewRequest, PersistenceError> {
        self.read()?
            .rows
            .get(id)
            .map(|row| row.request.clone())
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "Request",
                id: id.to_string(),
            })
    }

    fn list_by_responder(
        &self,
        responder_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, PersistenceError> {
        Ok(self
            .read()?
            .sorted_where(|request| &request.responder_id == responder_id))
    }

    fn list_by_proposer(
        &self,
        proposer_id: &UserId,
    ) -> Result<Vec<InterviewRequest>, PersistenceError> {
        Ok(self
            .read()?
            .sorted_where(|request| &request.proposer_id == proposer_id))
    }

    fn update(
        &self,
        request: InterviewRequest,
        expected: RequestStatus,
    ) -> Result<(), PersistenceError> {
        validate_request_invariants(&request)?;

        let mut table = self.write()?;
        let row: &mut StoredRequest = table.replaceable(&request, expected)?;
        expected.validate_transition(request.status)?;

        debug!(
            request_id = %request.id,
            from = %expected,
            after = %request.summary(),
            "Replaced interview request"
        );
        row.request = request;
        Ok(())
    }

    fn revert(
        &self,
        previous: InterviewRequest,
        resolved: RequestStatus,
    ) -> Result<(), PersistenceError> {
        validate_request_invariants(&previous)?;
        if !previous.is_pending() {
            return Err(PersistenceError::InvalidAggregate(
                DomainError::InconsistentSlotStates {
                    request_id: previous.id.to_string(),
                    reason: format!(
                        "only a pending request can be put back, got '{}'",
                        previous.status
                    ),
                },
            ));
        }

        let mut table = self.write()?;
        let row: &mut StoredRequest = table.replaceable(&previous, resolved)?;

        warn!(request_id = %previous.id, from = %resolved, "Reverted interview request to pending");
        row.request = previous;
        Ok(())
    }
}
