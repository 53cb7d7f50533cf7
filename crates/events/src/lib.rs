// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution events emitted by the negotiation engine.
//!
//! Every successful resolution produces exactly one `ResolutionEvent`.
//! Events are handed to a `NotificationSink` at least once; a sink that
//! needs exactly-once behaviour de-duplicates on `event_id`.

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

mod sink;

#[cfg(test)]
mod tests;

use interview_negotiation_domain::{InterviewId, RequestId, UserId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use sink::{NotificationSink, RecordingSink, SinkError, TracingSink};

/// The outcome a resolution event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionKind {
    RequestAccepted,
    RequestDeclined,
}

impl ResolutionKind {
    /// Returns the event name as delivered to sinks.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequestAccepted => "RequestAccepted",
            Self::RequestDeclined => "RequestDeclined",
        }
    }
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record describing how a request was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEvent {
    /// Unique per event; stable across redeliveries.
    pub event_id: String,
    pub kind: ResolutionKind,
    pub request_id: RequestId,
    pub responder_id: UserId,
    pub proposer_id: UserId,
    pub timestamp: OffsetDateTime,
    /// Set only for `RequestAccepted`.
    pub confirmed_interview_id: Option<InterviewId>,
}

impl ResolutionEvent {
    /// Creates an acceptance event.
    #[must_use]
    pub const fn accepted(
        event_id: String,
        request_id: RequestId,
        responder_id: UserId,
        proposer_id: UserId,
        timestamp: OffsetDateTime,
        confirmed_interview_id: InterviewId,
    ) -> Self {
        Self {
            event_id,
            kind: ResolutionKind::RequestAccepted,
            request_id,
            responder_id,
            proposer_id,
            timestamp,
            confirmed_interview_id: Some(confirmed_interview_id),
        }
    }

    /// Creates a decline event.
    #[must_use]
    pub const fn declined(
        event_id: String,
        request_id: RequestId,
        responder_id: UserId,
        proposer_id: UserId,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            event_id,
            kind: ResolutionKind::RequestDeclined,
            request_id,
            responder_id,
            proposer_id,
            timestamp,
            confirmed_interview_id: None,
        }
    }
}
