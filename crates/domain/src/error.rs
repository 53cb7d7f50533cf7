// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request was submitted without any time slots.
    EmptySlotBundle,
    /// Two slots in the same bundle share an identifier.
    DuplicateSlotId(String),
    /// An in-person slot has no location.
    MissingLocation(String),
    /// A slot has a zero or otherwise unusable duration.
    InvalidDuration {
        /// The offending slot.
        slot_id: String,
        /// The duration that was supplied.
        minutes: u16,
    },
    /// The job title is empty.
    InvalidJobTitle(String),
    /// An identifier is empty or blank.
    InvalidIdentifier {
        /// Which identifier was invalid (e.g. "proposer").
        kind: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// The timezone is not a recognised IANA zone name.
    InvalidTimezone(String),
    /// A slot mode string could not be parsed.
    InvalidSlotMode(String),
    /// A slot state string could not be parsed.
    InvalidSlotState(String),
    /// A request status string could not be parsed.
    InvalidRequestStatus(String),
    /// A time band string could not be parsed.
    InvalidTimeBand(String),
    /// A day-of-week string could not be parsed.
    InvalidDayOfWeek(String),
    /// A resolution action string could not be parsed.
    InvalidAction(String),
    /// A status transition is not permitted by the request lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// The slot states of a request disagree with its status.
    InconsistentSlotStates {
        /// The request whose invariant is broken.
        request_id: String,
        /// A description of the inconsistency.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlotBundle => write!(f, "Interview request must offer at least one slot"),
            Self::DuplicateSlotId(id) => {
                write!(f, "Slot id '{id}' appears more than once in the bundle")
            }
            Self::MissingLocation(id) => {
                write!(f, "In-person slot '{id}' must specify a location")
            }
            Self::InvalidDuration { slot_id, minutes } => {
                write!(f, "Slot '{slot_id}' has invalid duration of {minutes} minutes")
            }
            Self::InvalidJobTitle(msg) => write!(f, "Invalid job title: {msg}"),
            Self::InvalidIdentifier { kind, reason } => {
                write!(f, "Invalid {kind} identifier: {reason}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone '{tz}'"),
            Self::InvalidSlotMode(s) => write!(f, "Invalid slot mode: {s}"),
            Self::InvalidSlotState(s) => write!(f, "Invalid slot state: {s}"),
            Self::InvalidRequestStatus(s) => write!(f, "Invalid request status: {s}"),
            Self::InvalidTimeBand(s) => write!(f, "Invalid time band: {s}"),
            Self::InvalidDayOfWeek(s) => write!(f, "Invalid day of week: {s}"),
            Self::InvalidAction(s) => {
                write!(f, "Invalid action '{s}'. Must be 'accept' or 'decline'")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot transition request from '{from}' to '{to}'")
            }
            Self::InconsistentSlotStates { request_id, reason } => {
                write!(
                    f,
                    "Slot states of request '{request_id}' are inconsistent: {reason}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
