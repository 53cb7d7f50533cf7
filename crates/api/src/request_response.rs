// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times as `HH:MM` and timestamps as RFC 3339.
//! Enumerations travel as their lowercase wire names (`in_person`, `pending`).

use serde::{Deserialize, Serialize};

/// One slot as offered by a proposer, or as a candidate for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInput {
    /// Caller-chosen slot id. Assigned by the engine when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub date: String,
    pub time: String,
    pub duration_minutes: u16,
    /// `video`, `phone` or `in_person`.
    pub mode: String,
    /// Required for `in_person`.
    #[serde(default)]
    pub location: Option<String>,
}

/// API request to open a negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInterviewRequest {
    pub proposer_id: String,
    pub responder_id: String,
    pub job_title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub slots: Vec<SlotInput>,
}

/// API request to accept a slot or decline the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequestRequest {
    /// The slot being accepted. A decline names any slot of the bundle.
    pub slot_id: String,
    /// `accept` or `decline`.
    pub action: String,
}

/// Filter for listing requests. Exactly one party must be given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsQuery {
    #[serde(default)]
    pub responder: Option<String>,
    #[serde(default)]
    pub proposer: Option<String>,
    /// Only requests still awaiting an answer. Applies to `responder`.
    #[serde(default)]
    pub pending_only: bool,
}

/// API request to replace a responder's availability preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPreferenceRequest {
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub preferred_time_bands: Vec<String>,
    /// IANA zone name; UTC when omitted.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// API request to rank candidate slots against a responder's preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeSlotsRequest {
    pub slots: Vec<SlotInput>,
}

/// Slot details as stored on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub slot_id: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u16,
    pub mode: String,
    pub location: Option<String>,
    /// `open`, `consumed` or `voided`.
    pub state: String,
}

/// Interview request details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub request_id: String,
    pub proposer_id: String,
    pub responder_id: String,
    pub job_title: String,
    pub message: Option<String>,
    pub created_at: String,
    /// `pending`, `accepted` or `declined`.
    pub status: String,
    pub slots: Vec<SlotInfo>,
}

/// Confirmed interview details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewInfo {
    pub interview_id: String,
    pub request_id: String,
    pub slot_id: String,
    pub proposer_id: String,
    pub responder_id: String,
    pub job_title: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u16,
    pub mode: String,
    pub location: Option<String>,
    pub meeting_reference: Option<String>,
    pub created_at: String,
}

/// API response for a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequestResponse {
    pub request: RequestInfo,
    /// Present only for an accept.
    pub confirmed_interview: Option<InterviewInfo>,
    /// Identifier of the emitted resolution event.
    pub event_id: String,
    /// Whether the notification sink took the event during this call.
    pub notified: bool,
    /// A human-readable summary.
    pub message: String,
}

/// API response listing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsResponse {
    pub requests: Vec<RequestInfo>,
}

/// API response listing a user's confirmed interviews, earliest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInterviewsResponse {
    pub user_id: String,
    pub interviews: Vec<InterviewInfo>,
}

/// A responder's availability preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceInfo {
    pub responder_id: String,
    /// Monday first.
    pub preferred_days: Vec<String>,
    /// Morning first.
    pub preferred_time_bands: Vec<String>,
    pub timezone: String,
}

/// One ranked candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSlotInfo {
    pub id: Option<String>,
    pub date: String,
    pub time: String,
    pub duration_minutes: u16,
    pub mode: String,
    pub location: Option<String>,
    /// Preference criteria met, 0 to 2.
    pub match_score: u8,
}

/// API response for slot ranking. Same slots as submitted, best match first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeSlotsResponse {
    pub responder_id: String,
    pub slots: Vec<RankedSlotInfo>,
}

/// API response for a redelivery pass over undelivered events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeliverEventsResponse {
    pub delivered: usize,
}
