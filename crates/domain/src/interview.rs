// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::slot::SlotMode;
use crate::types::{InterviewId, RequestId, SlotId, UserId};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

/// A calendarable interview derived from an accepted request.
///
/// Exactly one record exists per accepted request, and it is never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedInterview {
    pub id: InterviewId,
    pub request_id: RequestId,
    pub slot_id: SlotId,
    pub proposer_id: UserId,
    pub responder_id: UserId,
    pub job_title: String,
    pub date: Date,
    pub time: Time,
    pub duration_minutes: u16,
    pub mode: SlotMode,
    pub location: Option<String>,
    /// Present only for video interviews.
    pub meeting_reference: Option<String>,
    pub created_at: OffsetDateTime,
}

impl ConfirmedInterview {
    /// Returns true if the user is either party of the interview.
    #[must_use]
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.proposer_id == user_id || &self.responder_id == user_id
    }

    /// Ordering key for upcoming-interview feeds.
    #[must_use]
    pub const fn schedule_key(&self) -> (Date, Time) {
        (self.date, self.time)
    }
}
