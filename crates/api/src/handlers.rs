// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers validate and convert wire DTOs, call the engine, and translate
//! the outcome back into response DTOs. They hold no state of their own.

use interview_negotiation::{NegotiationEngine, NewRequest, ResolutionOutcome, ResolveAction};
use interview_negotiation_domain::{
    AvailabilityPreference, ConfirmedInterview, DayOfWeek, DEFAULT_TIMEZONE, InterviewId,
    InterviewRequest, RequestId, SlotDraft, SlotId, SlotMode, TimeBand, TimeSlot, UserId,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::format::{format_date, format_time, format_timestamp, parse_date, parse_time};
use crate::request_response::{
    CreateInterviewRequest, InterviewInfo, ListInterviewsResponse, ListRequestsQuery,
    ListRequestsResponse, PreferenceInfo, ProposeSlotsRequest, ProposeSlotsResponse,
    RankedSlotInfo, RedeliverEventsResponse, RequestInfo, ResolveRequestRequest,
    ResolveRequestResponse, SetPreferenceRequest, SlotInfo, SlotInput,
};

/// Opens a negotiation from a proposer's offer.
///
/// # Errors
///
/// Returns `InvalidInput` if a date, time or mode cannot be parsed, or if the
/// engine rejects the request as malformed.
pub fn create_request(
    engine: &NegotiationEngine,
    request: CreateInterviewRequest,
) -> Result<RequestInfo, ApiError> {
    let slots: Vec<SlotDraft> = request
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| slot_draft(index, slot))
        .collect::<Result<_, _>>()?;

    let id: RequestId = engine
        .create_request(NewRequest {
            proposer_id: UserId::new(request.proposer_id),
            responder_id: UserId::new(request.responder_id),
            job_title: request.job_title,
            message: request.message,
            slots,
        })
        .map_err(translate_core_error)?;

    let stored: InterviewRequest = engine.get_request(&id).map_err(translate_core_error)?;
    request_info(&stored)
}

/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist.
pub fn get_request(engine: &NegotiationEngine, request_id: &str) -> Result<RequestInfo, ApiError> {
    let request: InterviewRequest = engine
        .get_request(&RequestId::new(request_id))
        .map_err(translate_core_error)?;
    request_info(&request)
}

/// Accepts a slot or declines the bundle.
///
/// # Errors
///
/// - `InvalidInput` if the action is neither `accept` nor `decline`
/// - `ResourceNotFound` if the request does not exist
/// - `SlotUnavailable` if the slot is not an open slot of the request
/// - `AlreadyResolved` if someone already answered
pub fn resolve_request(
    engine: &NegotiationEngine,
    request_id: &str,
    request: &ResolveRequestRequest,
) -> Result<ResolveRequestResponse, ApiError> {
    let action: ResolveAction = ResolveAction::from_str(request.action.trim())
        .map_err(|err| translate_domain_error(&err))?;

    let outcome: ResolutionOutcome = engine
        .resolve(
            &RequestId::new(request_id),
            &SlotId::new(request.slot_id.trim()),
            action,
        )
        .map_err(translate_core_error)?;

    let message: String = match action {
        ResolveAction::Accept => format!(
            "Accepted slot '{}' of request '{}'",
            request.slot_id.trim(),
            request_id
        ),
        ResolveAction::Decline => format!("Declined request '{request_id}'"),
    };

    Ok(ResolveRequestResponse {
        request: request_info(&outcome.request)?,
        confirmed_interview: outcome.confirmed.as_ref().map(interview_info).transpose()?,
        event_id: outcome.event.event_id,
        notified: outcome.delivered,
        message,
    })
}

/// Lists requests for one party, oldest first.
///
/// # Errors
///
/// Returns `InvalidInput` unless exactly one of `responder` and `proposer` is
/// given.
pub fn list_requests(
    engine: &NegotiationEngine,
    query: &ListRequestsQuery,
) -> Result<ListRequestsResponse, ApiError> {
    let requests: Vec<InterviewRequest> = match (&query.responder, &query.proposer) {
        (Some(responder), None) => {
            let responder: UserId = UserId::new(responder.as_str());
            if query.pending_only {
                engine.pending_for_responder(&responder)
            } else {
                engine.list_by_responder(&responder)
            }
        }
        (None, Some(proposer)) => {
            let proposer: UserId = UserId::new(proposer.as_str());
            engine.list_by_proposer(&proposer).map(|mut requests| {
                if query.pending_only {
                    requests.retain(InterviewRequest::is_pending);
                }
                requests
            })
        }
        _ => {
            return Err(ApiError::InvalidInput {
                field: String::from("query"),
                message: String::from("Specify exactly one of 'responder' or 'proposer'"),
            });
        }
    }
    .map_err(translate_core_error)?;

    Ok(ListRequestsResponse {
        requests: requests
            .iter()
            .map(request_info)
            .collect::<Result<_, _>>()?,
    })
}

/// # Errors
///
/// Returns `ResourceNotFound` if no interview has this id.
pub fn get_interview(
    engine: &NegotiationEngine,
    interview_id: &str,
) -> Result<InterviewInfo, ApiError> {
    let record: ConfirmedInterview = engine
        .get_confirmed_interview(&InterviewId::new(interview_id))
        .map_err(translate_core_error)?;
    interview_info(&record)
}

/// Confirmed interviews where the user is either party, earliest first.
///
/// # Errors
///
/// Returns `Internal` if the registry cannot be read.
pub fn list_user_interviews(
    engine: &NegotiationEngine,
    user_id: &str,
) -> Result<ListInterviewsResponse, ApiError> {
    let records: Vec<ConfirmedInterview> = engine
        .list_confirmed_by_user(&UserId::new(user_id))
        .map_err(translate_core_error)?;

    Ok(ListInterviewsResponse {
        user_id: user_id.to_string(),
        interviews: records
            .iter()
            .map(interview_info)
            .collect::<Result<_, _>>()?,
    })
}

/// Returns the stored preference, or the UTC default when none was set.
///
/// # Errors
///
/// Returns `Internal` if the preference store cannot be read.
pub fn get_preference(
    engine: &NegotiationEngine,
    responder_id: &str,
) -> Result<PreferenceInfo, ApiError> {
    let preference: AvailabilityPreference = engine
        .get_preference(&UserId::new(responder_id))
        .map_err(translate_core_error)?;
    Ok(preference_info(&preference))
}

/// Replaces a responder's preference. Nothing is merged with the old one.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown day, band or timezone.
pub fn set_preference(
    engine: &NegotiationEngine,
    responder_id: &str,
    request: &SetPreferenceRequest,
) -> Result<PreferenceInfo, ApiError> {
    let responder: UserId = UserId::new(responder_id);
    if responder.is_blank() {
        return Err(ApiError::InvalidInput {
            field: String::from("responder_id"),
            message: String::from("Responder id cannot be empty"),
        });
    }

    let preferred_days: BTreeSet<DayOfWeek> = request
        .preferred_days
        .iter()
        .map(|day| DayOfWeek::from_str(day.trim()))
        .collect::<Result<_, _>>()
        .map_err(|err| translate_domain_error(&err))?;
    let preferred_time_bands: BTreeSet<TimeBand> = request
        .preferred_time_bands
        .iter()
        .map(|band| TimeBand::from_str(band.trim()))
        .collect::<Result<_, _>>()
        .map_err(|err| translate_domain_error(&err))?;
    let timezone: &str = request.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);

    let preference: AvailabilityPreference = AvailabilityPreference::new(
        responder.clone(),
        preferred_days,
        preferred_time_bands,
        timezone,
    )
    .map_err(|err| translate_domain_error(&err))?;

    engine
        .set_preference(&responder, preference.clone())
        .map_err(translate_core_error)?;
    Ok(preference_info(&preference))
}

/// Ranks candidate slots against the responder's preference.
///
/// The response holds exactly the submitted slots, reordered.
///
/// # Errors
///
/// Returns `InvalidInput` if a candidate cannot be parsed.
pub fn propose_slots(
    engine: &NegotiationEngine,
    responder_id: &str,
    request: &ProposeSlotsRequest,
) -> Result<ProposeSlotsResponse, ApiError> {
    let responder: UserId = UserId::new(responder_id);
    let candidates: Vec<SlotDraft> = request
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| slot_draft(index, slot))
        .collect::<Result<_, _>>()?;

    let preference: AvailabilityPreference = engine
        .get_preference(&responder)
        .map_err(translate_core_error)?;
    // One read of the preference drives both the order and the scores.
    let ranked: Vec<SlotDraft> = interview_negotiation::propose_slots(&preference, candidates);
    debug!(responder_id = %responder, candidates = ranked.len(), "Ranked candidate slots");

    let slots: Vec<RankedSlotInfo> = ranked
        .iter()
        .map(|draft| {
            Ok(RankedSlotInfo {
                id: draft.id.as_ref().map(ToString::to_string),
                date: format_date(draft.date)?,
                time: format_time(draft.time)?,
                duration_minutes: draft.duration_minutes,
                mode: draft.mode.as_str().to_string(),
                location: draft.location.clone(),
                match_score: preference.match_score(draft.date, draft.time),
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(ProposeSlotsResponse {
        responder_id: responder_id.to_string(),
        slots,
    })
}

/// Offers every undelivered resolution event to the sink again.
///
/// # Errors
///
/// Returns `Internal` if the outbox cannot be read.
pub fn redeliver_events(engine: &NegotiationEngine) -> Result<RedeliverEventsResponse, ApiError> {
    let delivered: usize = engine.redeliver_pending().map_err(translate_core_error)?;
    Ok(RedeliverEventsResponse { delivered })
}

fn slot_draft(index: usize, slot: &SlotInput) -> Result<SlotDraft, ApiError> {
    let mode: SlotMode = SlotMode::from_str(slot.mode.trim()).map_err(|err| {
        ApiError::InvalidInput {
            field: format!("slots[{index}].mode"),
            message: err.to_string(),
        }
    })?;

    let draft: SlotDraft = SlotDraft::new(
        parse_date(&format!("slots[{index}].date"), &slot.date)?,
        parse_time(&format!("slots[{index}].time"), &slot.time)?,
        slot.duration_minutes,
        mode,
        slot.location.clone(),
    );

    Ok(match &slot.id {
        Some(id) => draft.with_id(SlotId::new(id.trim())),
        None => draft,
    })
}

fn slot_info(slot: &TimeSlot) -> Result<SlotInfo, ApiError> {
    Ok(SlotInfo {
        slot_id: slot.id.to_string(),
        date: format_date(slot.date)?,
        time: format_time(slot.time)?,
        duration_minutes: slot.duration_minutes,
        mode: slot.mode.as_str().to_string(),
        location: slot.location.clone(),
        state: slot.state.as_str().to_string(),
    })
}

fn request_info(request: &InterviewRequest) -> Result<RequestInfo, ApiError> {
    Ok(RequestInfo {
        request_id: request.id.to_string(),
        proposer_id: request.proposer_id.to_string(),
        responder_id: request.responder_id.to_string(),
        job_title: request.job_title.clone(),
        message: request.message.clone(),
        created_at: format_timestamp(request.created_at)?,
        status: request.status.as_str().to_string(),
        slots: request
            .slots
            .iter()
            .map(slot_info)
            .collect::<Result<_, _>>()?,
    })
}

fn interview_info(record: &ConfirmedInterview) -> Result<InterviewInfo, ApiError> {
    Ok(InterviewInfo {
        interview_id: record.id.to_string(),
        request_id: record.request_id.to_string(),
        slot_id: record.slot_id.to_string(),
        proposer_id: record.proposer_id.to_string(),
        responder_id: record.responder_id.to_string(),
        job_title: record.job_title.clone(),
        date: format_date(record.date)?,
        time: format_time(record.time)?,
        duration_minutes: record.duration_minutes,
        mode: record.mode.as_str().to_string(),
        location: record.location.clone(),
        meeting_reference: record.meeting_reference.clone(),
        created_at: format_timestamp(record.created_at)?,
    })
}

fn preference_info(preference: &AvailabilityPreference) -> PreferenceInfo {
    PreferenceInfo {
        responder_id: preference.responder_id.to_string(),
        preferred_days: preference
            .preferred_days
            .iter()
            .map(|day| day.as_str().to_string())
            .collect(),
        preferred_time_bands: preference
            .preferred_time_bands
            .iter()
            .map(|band| band.as_str().to_string())
            .collect(),
        timezone: preference.timezone().to_string(),
    }
}
