// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use interview_negotiation_domain::{ConfirmedInterview, InterviewId, RequestId, SlotId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tracing::{debug, error, warn};

/// Registry of confirmed interviews.
///
/// Records are only ever removed to withdraw an interview whose resolution
/// could not be committed.
pub trait InterviewRegistry: Send + Sync {
    /// Appends a record.
    ///
    /// Slot ids are unique only within their request, so a slot is identified
    /// by the `(request_id, slot_id)` pair. A request can own at most one
    /// confirmed interview.
    ///
    /// # Errors
    ///
    /// - `DuplicateSlot` if the slot, or any slot of the same request, is
    ///   already confirmed
    /// - `DuplicateInterview` if the interview id is taken
    fn add(&self, record: ConfirmedInterview) -> Result<(), PersistenceError>;

    /// Loads an interview by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no interview has this id.
    fn get(&self, id: &InterviewId) -> Result<ConfirmedInterview, PersistenceError>;

    /// Interviews where the user is proposer or responder, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read.
    fn list_by_user(&self, user_id: &UserId) -> Result<Vec<ConfirmedInterview>, PersistenceError>;

    /// The interview confirmed from a request, if it was accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read.
    fn find_by_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<ConfirmedInterview>, PersistenceError>;

    /// Withdraws a record. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be written.
    fn remove(&self, id: &InterviewId) -> Result<(), PersistenceError>;
}

#[derive(Debug, Default)]
struct InterviewTable {
    records: Vec<ConfirmedInterview>,
    by_id: HashMap<InterviewId, usize>,
    by_request: HashMap<RequestId, usize>,
    confirmed_slots: HashSet<(RequestId, SlotId)>,
}

impl InterviewTable {
    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_request.clear();
        self.confirmed_slots.clear();
        for (index, record) in self.records.iter().enumerate() {
            self.by_id.insert(record.id.clone(), index);
            self.by_request.insert(record.request_id.clone(), index);
            self.confirmed_slots
                .insert((record.request_id.clone(), record.slot_id.clone()));
        }
    }
}

/// In-process `InterviewRegistry`.
#[derive(Debug, Default)]
pub struct InMemoryInterviewRegistry {
    table: RwLock<InterviewTable>,
}

impl InMemoryInterviewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if the registry cannot be read.
    pub fn all(&self) -> Result<Vec<ConfirmedInterview>, PersistenceError> {
        Ok(self.read()?.records.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, InterviewTable>, PersistenceError> {
        self.table
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("interviews"))
    }
}

impl InterviewRegistry for InMemoryInterviewRegistry {
    fn add(&self, record: ConfirmedInterview) -> Result<(), PersistenceError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("interviews"))?;

        let slot_key: (RequestId, SlotId) = (record.request_id.clone(), record.slot_id.clone());
        if table.confirmed_slots.contains(&slot_key)
            || table.by_request.contains_key(&record.request_id)
        {
            error!(
                request_id = %record.request_id,
                slot_id = %record.slot_id,
                "Refusing second confirmed interview for one request"
            );
            return Err(PersistenceError::DuplicateSlot {
                request_id: record.request_id.to_string(),
                slot_id: record.slot_id.to_string(),
            });
        }

        if table.by_id.contains_key(&record.id) {
            return Err(PersistenceError::DuplicateInterview(record.id.to_string()));
        }

        let index: usize = table.records.len();
        table.by_id.insert(record.id.clone(), index);
        table.by_request.insert(record.request_id.clone(), index);
        table.confirmed_slots.insert(slot_key);
        debug!(interview_id = %record.id, request_id = %record.request_id, "Registered confirmed interview");
        table.records.push(record);
        Ok(())
    }

    fn get(&self, id: &InterviewId) -> Result<ConfirmedInterview, PersistenceError> {
        let table = self.read()?;
        table
            .by_id
            .get(id)
            .and_then(|&index| table.records.get(index))
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "Interview",
                id: id.to_string(),
            })
    }

    fn list_by_user(&self, user_id: &UserId) -> Result<Vec<ConfirmedInterview>, PersistenceError> {
        let table = self.read()?;
        let mut matched: Vec<(usize, &ConfirmedInterview)> = table
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.involves(user_id))
            .collect();
        matched.sort_by_key(|(index, record)| (record.schedule_key(), *index));
        Ok(matched.into_iter().map(|(_, record)| record.clone()).collect())
    }

    fn find_by_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<ConfirmedInterview>, PersistenceError> {
        let table = self.read()?;
        Ok(table
            .by_request
            .get(request_id)
            .and_then(|&index| table.records.get(index))
            .cloned())
    }

    fn remove(&self, id: &InterviewId) -> Result<(), PersistenceError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("interviews"))?;

        if let Some(index) = table.by_id.get(id).copied() {
            let record: ConfirmedInterview = table.records.remove(index);
            table.reindex();
            warn!(interview_id = %record.id, request_id = %record.request_id, "Withdrew confirmed interview");
        }
        Ok(())
    }
}
