// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use interview_negotiation::CoreError;
use interview_negotiation_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The named slot is not an open slot of the request.
    #[error("Slot '{slot_id}' is not available on request '{request_id}'")]
    SlotUnavailable {
        /// The request that was addressed.
        request_id: String,
        /// The slot that was named.
        slot_id: String,
    },
    /// The request was already accepted or declined.
    #[error("Request '{request_id}' has already been {status}")]
    AlreadyResolved {
        /// The settled request.
        request_id: String,
        /// Its terminal status.
        status: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

/// Translates a domain error into an API error.
///
/// Every domain error reaching the API is a problem with caller input.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    let field: &str = match err {
        DomainError::EmptySlotBundle | DomainError::DuplicateSlotId(_) => "slots",
        DomainError::MissingLocation(_) => "location",
        DomainError::InvalidDuration { .. } => "duration_minutes",
        DomainError::InvalidJobTitle(_) => "job_title",
        DomainError::InvalidIdentifier { kind, .. } => match *kind {
            "proposer" => "proposer_id",
            "responder" => "responder_id",
            "slot" => "slot_id",
            _ => "id",
        },
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::InvalidSlotMode(_) => "mode",
        DomainError::InvalidSlotState(_) => "state",
        DomainError::InvalidRequestStatus(_) | DomainError::InvalidStatusTransition { .. } => {
            "status"
        }
        DomainError::InvalidTimeBand(_) => "preferred_time_bands",
        DomainError::InvalidDayOfWeek(_) => "preferred_days",
        DomainError::InvalidAction(_) => "action",
        DomainError::InconsistentSlotStates { .. } => "slots",
    };

    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::InvalidRequest(domain_err) => translate_domain_error(&domain_err),
        CoreError::NotFound { kind, id } => ApiError::ResourceNotFound {
            resource_type: kind.to_string(),
            message: format!("No {kind} with id '{id}'"),
        },
        CoreError::UnknownSlot {
            request_id,
            slot_id,
        } => ApiError::SlotUnavailable {
            request_id,
            slot_id,
        },
        CoreError::AlreadyResolved { request_id, status } => ApiError::AlreadyResolved {
            request_id,
            status: status.to_string(),
        },
        err @ (CoreError::DuplicateSlot { .. } | CoreError::Storage(_)) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
