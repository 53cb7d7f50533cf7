// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use interview_negotiation_domain::{DomainError, RequestStatus, SlotDraft, UserId};
use std::str::FromStr;

/// The responder's answer to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveAction {
    /// Take the named slot; every other slot is voided.
    Accept,
    /// Turn down the whole bundle.
    Decline,
}

impl ResolveAction {
    /// The request status this action resolves to.
    #[must_use]
    pub const fn target_status(&self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Decline => RequestStatus::Declined,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
        }
    }
}

impl FromStr for ResolveAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            _ => Err(DomainError::InvalidAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for ResolveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a proposer supplies to open a negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub proposer_id: UserId,
    pub responder_id: UserId,
    pub job_title: String,
    pub message: Option<String>,
    /// Offered slots in the order the responder should see them.
    pub slots: Vec<SlotDraft>,
}
