// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock and identifier sources the engine depends on.

use interview_negotiation_domain::{InterviewId, RequestId, SlotId};
use time::OffsetDateTime;
use uuid::Uuid;

/// Supplies the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Mints unique identifiers and meeting tokens.
pub trait IdSource: Send + Sync {
    fn next_request_id(&self) -> RequestId;
    fn next_slot_id(&self) -> SlotId;
    fn next_interview_id(&self) -> InterviewId;
    fn next_event_id(&self) -> String;
    /// An opaque, hard-to-guess token for a video meeting.
    fn meeting_token(&self) -> String;
}

/// UUIDv4 identifiers and random meeting tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_request_id(&self) -> RequestId {
        RequestId::new(format!("req_{}", Uuid::new_v4().simple()))
    }

    fn next_slot_id(&self) -> SlotId {
        SlotId::new(format!("slot_{}", Uuid::new_v4().simple()))
    }

    fn next_interview_id(&self) -> InterviewId {
        InterviewId::new(format!("int_{}", Uuid::new_v4().simple()))
    }

    fn next_event_id(&self) -> String {
        format!("evt_{}", Uuid::new_v4().simple())
    }

    fn meeting_token(&self) -> String {
        format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }
}
