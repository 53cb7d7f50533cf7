// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::request::{InterviewRequest, RequestStatus};
use crate::slot::{SlotState, TimeSlot};
use crate::types::UserId;
use std::collections::HashSet;

/// Validates a slot bundle as offered by a proposer.
///
/// # Arguments
///
/// * `slots` - The ordered slots of one request
///
/// # Errors
///
/// Returns an error if:
/// - The bundle is empty
/// - Two slots share an id
/// - An in-person slot has no location
/// - A slot has a zero duration
pub fn validate_slot_bundle(slots: &[TimeSlot]) -> Result<(), DomainError> {
    if slots.is_empty() {
        return Err(DomainError::EmptySlotBundle);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(slots.len());
    for slot in slots {
        if slot.id.is_blank() {
            return Err(DomainError::InvalidIdentifier {
                kind: "slot",
                reason: String::from("Slot id cannot be empty"),
            });
        }

        if !seen.insert(slot.id.as_str()) {
            return Err(DomainError::DuplicateSlotId(slot.id.to_string()));
        }

        if slot.mode.requires_location() && slot.trimmed_location().is_none() {
            return Err(DomainError::MissingLocation(slot.id.to_string()));
        }

        if slot.duration_minutes == 0 {
            return Err(DomainError::InvalidDuration {
                slot_id: slot.id.to_string(),
                minutes: slot.duration_minutes,
            });
        }
    }

    Ok(())
}

/// Validates the non-slot fields of a new request.
///
/// # Errors
///
/// Returns an error if either party id is blank or the job title is empty.
pub fn validate_request_fields(
    proposer_id: &UserId,
    responder_id: &UserId,
    job_title: &str,
) -> Result<(), DomainError> {
    if proposer_id.is_blank() {
        return Err(DomainError::InvalidIdentifier {
            kind: "proposer",
            reason: String::from("Proposer id cannot be empty"),
        });
    }

    if responder_id.is_blank() {
        return Err(DomainError::InvalidIdentifier {
            kind: "responder",
            reason: String::from("Responder id cannot be empty"),
        });
    }

    if job_title.trim().is_empty() {
        return Err(DomainError::InvalidJobTitle(String::from(
            "Job title cannot be empty",
        )));
    }

    Ok(())
}

/// Checks that a request's slot states agree with its status.
///
/// - `Pending`: every slot is `Open`
/// - `Accepted`: exactly one slot is `Consumed`, all others `Voided`
/// - `Declined`: every slot is `Voided`
///
/// The bundle itself is validated too, so a stored aggregate that passes
/// this check is well-formed in every respect.
///
/// # Errors
///
/// Returns the bundle error, or `DomainError::InconsistentSlotStates`.
pub fn validate_request_invariants(request: &InterviewRequest) -> Result<(), DomainError> {
    validate_slot_bundle(&request.slots)?;

    let total: usize = request.slots.len();
    let open: usize = request.count_in_state(SlotState::Open);
    let consumed: usize = request.count_in_state(SlotState::Consumed);
    let voided: usize = request.count_in_state(SlotState::Voided);

    let reason: Option<String> = match request.status {
        RequestStatus::Pending if open != total => Some(format!(
            "pending request has {} non-open slot(s)",
            total - open
        )),
        RequestStatus::Accepted if consumed != 1 || voided != total - 1 => Some(format!(
            "accepted request must have exactly one consumed slot, found consumed={consumed}, voided={voided}"
        )),
        RequestStatus::Declined if voided != total => Some(format!(
            "declined request has {} non-voided slot(s)",
            total - voided
        )),
        RequestStatus::Pending | RequestStatus::Accepted | RequestStatus::Declined => None,
    };

    reason.map_or(Ok(()), |reason| {
        Err(DomainError::InconsistentSlotStates {
            request_id: request.id.to_string(),
            reason,
        })
    })
}
