// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure resolution transitions.
//!
//! Nothing here touches storage. The engine loads a request, runs it through
//! `apply_resolution`, and persists the result under the request's lock.

use crate::command::ResolveAction;
use crate::error::CoreError;
use interview_negotiation_domain::{
    ConfirmedInterview, InterviewId, InterviewRequest, SlotId, SlotMode, SlotState, TimeSlot,
};
use time::OffsetDateTime;

/// Applies an accept or decline to a pending request, producing the resolved
/// aggregate.
///
/// # Arguments
///
/// * `request` - The request as currently stored (unchanged by this call)
/// * `slot_id` - The slot the responder named
/// * `action` - Accept or decline
///
/// # Errors
///
/// - `AlreadyResolved` if the request is not pending
/// - `UnknownSlot` if the slot is not in the bundle or is not open
pub fn apply_resolution(
    request: &InterviewRequest,
    slot_id: &SlotId,
    action: ResolveAction,
) -> Result<InterviewRequest, CoreError> {
    if request.status.is_terminal() {
        return Err(CoreError::AlreadyResolved {
            request_id: request.id.to_string(),
            status: request.status,
        });
    }

    let named_is_open: bool = request.slot(slot_id).is_some_and(TimeSlot::is_open);
    if !named_is_open {
        return Err(CoreError::UnknownSlot {
            request_id: request.id.to_string(),
            slot_id: slot_id.to_string(),
        });
    }

    let mut resolved: InterviewRequest = request.clone();
    for slot in &mut resolved.slots {
        slot.state = match action {
            ResolveAction::Accept if &slot.id == slot_id => SlotState::Consumed,
            ResolveAction::Accept | ResolveAction::Decline => SlotState::Voided,
        };
    }
    resolved.status = action.target_status();

    Ok(resolved)
}

/// Derives the confirmed interview for the consumed slot of an accepted request.
///
/// The meeting reference is dropped unless the slot is a video slot.
#[must_use]
pub fn confirm_interview(
    request: &InterviewRequest,
    slot: &TimeSlot,
    id: InterviewId,
    created_at: OffsetDateTime,
    meeting_reference: Option<String>,
) -> ConfirmedInterview {
    ConfirmedInterview {
        id,
        request_id: request.id.clone(),
        slot_id: slot.id.clone(),
        proposer_id: request.proposer_id.clone(),
        responder_id: request.responder_id.clone(),
        job_title: request.job_title.clone(),
        date: slot.date,
        time: slot.time,
        duration_minutes: slot.duration_minutes,
        mode: slot.mode,
        location: slot.trimmed_location().map(String::from),
        meeting_reference: meeting_reference.filter(|_| slot.mode == SlotMode::Video),
        created_at,
    }
}
