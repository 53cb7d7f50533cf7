// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use interview_negotiation_domain::{
    ConfirmedInterview, InterviewId, InterviewRequest, RequestId, RequestStatus, SlotId, SlotMode,
    SlotState, TimeSlot, UserId,
};
use interview_negotiation_events::ResolutionEvent;
use time::macros::{date, datetime, time};
use time::{Date, OffsetDateTime, Time};

pub fn create_test_slot(id: &str, date: Date, time: Time) -> TimeSlot {
    TimeSlot {
        id: SlotId::new(id),
        date,
        time,
        duration_minutes: 30,
        mode: SlotMode::Video,
        location: None,
        state: SlotState::Open,
    }
}

pub fn create_test_request(id: &str, responder: &str, created_at: OffsetDateTime) -> InterviewRequest {
    InterviewRequest::pending(
        RequestId::new(id),
        UserId::new("employer-1"),
        UserId::new(responder),
        String::from("Backend Engineer"),
        Some(String::from("Looking forward to talking")),
        created_at,
        vec![
            create_test_slot("S1", date!(2024 - 01 - 25), time!(10:00)),
            create_test_slot("S2", date!(2024 - 01 - 25), time!(14:00)),
        ],
    )
}

pub fn default_created_at() -> OffsetDateTime {
    datetime!(2024-01-20 09:00 UTC)
}

/// Marks `slot` consumed and every sibling voided.
pub fn accept(mut request: InterviewRequest, slot: &str) -> InterviewRequest {
    for candidate in &mut request.slots {
        candidate.state = if candidate.id.as_str() == slot {
            SlotState::Consumed
        } else {
            SlotState::Voided
        };
    }
    request.status = RequestStatus::Accepted;
    request
}

pub fn create_test_interview(
    id: &str,
    request_id: &str,
    slot_id: &str,
    date: Date,
    time: Time,
) -> ConfirmedInterview {
    ConfirmedInterview {
        id: InterviewId::new(id),
        request_id: RequestId::new(request_id),
        slot_id: SlotId::new(slot_id),
        proposer_id: UserId::new("employer-1"),
        responder_id: UserId::new("cand-1"),
        job_title: String::from("Backend Engineer"),
        date,
        time,
        duration_minutes: 30,
        mode: SlotMode::Video,
        location: None,
        meeting_reference: Some(String::from("tok-1")),
        created_at: datetime!(2024-01-21 09:00 UTC),
    }
}

pub fn create_test_event(id: &str) -> ResolutionEvent {
    ResolutionEvent::declined(
        id.to_string(),
        RequestId::new("req-1"),
        UserId::new("cand-1"),
        UserId::new("employer-1"),
        datetime!(2024-01-21 09:00 UTC),
    )
}
