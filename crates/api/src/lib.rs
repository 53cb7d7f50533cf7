// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the interview negotiation engine.
//!
//! Callers exchange plain string-typed DTOs; this crate parses them into
//! domain values, calls the engine, and translates every failure into an
//! `ApiError` that a transport can map onto its own status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod format;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    create_request, get_interview, get_preference, get_request, list_requests,
    list_user_interviews, propose_slots, redeliver_events, resolve_request, set_preference,
};
pub use request_response::{
    CreateInterviewRequest, InterviewInfo, ListInterviewsResponse, ListRequestsQuery,
    ListRequestsResponse, PreferenceInfo, ProposeSlotsRequest, ProposeSlotsResponse,
    RankedSlotInfo, RedeliverEventsResponse, RequestInfo, ResolveRequestRequest,
    ResolveRequestResponse, SetPreferenceRequest, SlotInfo, SlotInput,
};
