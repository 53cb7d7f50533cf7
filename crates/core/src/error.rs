// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use interview_negotiation_domain::{DomainError, RequestStatus};
use interview_negotiation_persistence::PersistenceError;

/// Errors returned by the negotiation engine.
///
/// `InvalidRequest`, `NotFound`, `UnknownSlot` and `AlreadyResolved` are
/// ordinary outcomes for the caller to present. `DuplicateSlot` means the
/// one-interview-per-request rule was broken and is a defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Creation input is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(DomainError),
    /// The referenced request or interview does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of record.
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// The slot is not part of the request, or is no longer open.
    #[error("Slot '{slot_id}' is not an open slot of request '{request_id}'")]
    UnknownSlot {
        /// The request that was addressed.
        request_id: String,
        /// The slot that was named.
        slot_id: String,
    },
    /// The request has already left `pending`.
    #[error("Request '{request_id}' is already {status}")]
    AlreadyResolved {
        /// The settled request.
        request_id: String,
        /// Its terminal status.
        status: RequestStatus,
    },
    /// A second confirmed interview was about to be created for one request.
    #[error("Duplicate confirmed interview for slot '{slot_id}' of request '{request_id}'")]
    DuplicateSlot {
        /// The request concerned.
        request_id: String,
        /// The slot concerned.
        slot_id: String,
    },
    /// The storage layer failed for a reason unrelated to the request itself.
    #[error("Storage failure: {0}")]
    Storage(PersistenceError),
}

impl CoreError {
    /// Returns true for outcomes a caller is expected to handle in the UI.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_)
                | Self::NotFound { .. }
                | Self::UnknownSlot { .. }
                | Self::AlreadyResolved { .. }
        )
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::InvalidRequest(err)
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::InvalidAggregate(domain) => Self::InvalidRequest(domain),
            PersistenceError::NotFound { kind, id } => Self::NotFound { kind, id },
            PersistenceError::StatusConflict {
                request_id, found, ..
            } => Self::AlreadyResolved {
                request_id,
                status: found,
            },
            PersistenceError::DuplicateSlot {
                request_id,
                slot_id,
            } => Self::DuplicateSlot {
                request_id,
                slot_id,
            },
            other => Self::Storage(other),
        }
    }
}
