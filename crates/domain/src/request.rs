// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The interview request aggregate and its status lifecycle.
//!
//! A request is created `Pending` and is resolved exactly once, to either
//! `Accepted` or `Declined`. Both outcomes are terminal. A reschedule is not a
//! transition of the same aggregate; the proposer issues a new request.

use crate::error::DomainError;
use crate::slot::{SlotState, TimeSlot};
use crate::types::{RequestId, SlotId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Status of an interview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting the responder's decision.
    #[default]
    Pending,
    /// The responder accepted one slot.
    Accepted,
    /// The responder declined the whole bundle.
    Declined,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Accepted
    /// - Pending → Declined
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Declined)
        )
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the lifecycle forbids it.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposer's offer bundle: one role, one responder, several slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    pub id: RequestId,
    pub proposer_id: UserId,
    pub responder_id: UserId,
    pub job_title: String,
    pub message: Option<String>,
    pub created_at: OffsetDateTime,
    /// Ordered, non-empty; slot ids are unique within the request.
    pub slots: Vec<TimeSlot>,
    pub status: RequestStatus,
}

impl InterviewRequest {
    /// Creates a pending request. Every slot is forced to `Open`.
    ///
    /// This does not validate the bundle; see `validate_slot_bundle`.
    #[must_use]
    pub fn pending(
        id: RequestId,
        proposer_id: UserId,
        responder_id: UserId,
        job_title: String,
        message: Option<String>,
        created_at: OffsetDateTime,
        slots: Vec<TimeSlot>,
    ) -> Self {
        let slots = slots
            .into_iter()
            .map(|mut slot| {
                slot.state = SlotState::Open;
                slot
            })
            .collect();

        Self {
            id,
            proposer_id,
            responder_id,
            job_title,
            message,
            created_at,
            slots,
            status: RequestStatus::Pending,
        }
    }

    /// Looks up a slot by id.
    #[must_use]
    pub fn slot(&self, slot_id: &SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| &slot.id == slot_id)
    }

    /// Returns the consumed slot of an accepted request.
    #[must_use]
    pub fn consumed_slot(&self) -> Option<&TimeSlot> {
        self.slots
            .iter()
            .find(|slot| slot.state == SlotState::Consumed)
    }

    /// Returns true while the request awaits resolution.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Returns true if the user is either party of the request.
    #[must_use]
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.proposer_id == user_id || &self.responder_id == user_id
    }

    /// Counts slots in the given state.
    #[must_use]
    pub fn count_in_state(&self, state: SlotState) -> usize {
        self.slots.iter().filter(|slot| slot.state == state).count()
    }

    /// Short summary used in log fields.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "status={},open={},consumed={},voided={}",
            self.status,
            self.count_in_state(SlotState::Open),
            self.count_in_state(SlotState::Consumed),
            self.count_in_state(SlotState::Voided)
        )
    }
}
