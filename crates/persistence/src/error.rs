// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use interview_negotiation_domain::{DomainError, RequestStatus};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The aggregate failed validation at the storage boundary.
    #[error("Invalid aggregate: {0}")]
    InvalidAggregate(#[from] DomainError),
    /// The requested record was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of record (request, interview).
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// A request with the same id is already stored.
    #[error("Request already exists: {0}")]
    DuplicateRequest(String),
    /// An interview with the same id is already stored.
    #[error("Interview already exists: {0}")]
    DuplicateInterview(String),
    /// A confirmed interview already exists for this request slot.
    #[error("Confirmed interview already exists for slot '{slot_id}' of request '{request_id}'")]
    DuplicateSlot {
        /// The request the slot belongs to.
        request_id: String,
        /// The slot that was already confirmed.
        slot_id: String,
    },
    /// The stored status differs from the status the writer expected.
    #[error("Request '{request_id}' status is '{found}', expected '{expected}'")]
    StatusConflict {
        /// The request being updated.
        request_id: String,
        /// The status the writer read.
        expected: RequestStatus,
        /// The status currently stored.
        found: RequestStatus,
    },
    /// An update tried to change the slot bundle of a request.
    #[error("Slot bundle of request '{0}' cannot be changed")]
    BundleChanged(String),
    /// A lock guarding the named store was poisoned by a panicking writer.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A snapshot is internally inconsistent.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
