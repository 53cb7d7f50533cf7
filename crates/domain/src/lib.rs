// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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
mod interview;
mod preference;
mod request;
mod slot;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use interview::ConfirmedInterview;
pub use preference::{AvailabilityPreference, DEFAULT_TIMEZONE, DayOfWeek};
pub use request::{InterviewRequest, RequestStatus};
pub use slot::{SlotDraft, SlotMode, SlotState, TimeBand, TimeSlot};
pub use types::{InterviewId, RequestId, SlotId, UserId};
pub use validation::{validate_request_fields, validate_request_invariants, validate_slot_bundle};
