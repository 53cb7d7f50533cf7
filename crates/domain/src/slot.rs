// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time slots offered inside an interview request.

use crate::error::DomainError;
use crate::types::SlotId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Time};

/// How an interview in a given slot is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMode {
    Video,
    Phone,
    InPerson,
}

impl SlotMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Phone => "phone",
            Self::InPerson => "in_person",
        }
    }

    /// Returns true if slots of this mode must carry a location.
    #[must_use]
    pub const fn requires_location(&self) -> bool {
        matches!(self, Self::InPerson)
    }
}

impl FromStr for SlotMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "phone" => Ok(Self::Phone),
            "in_person" => Ok(Self::InPerson),
            _ => Err(DomainError::InvalidSlotMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for SlotMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a single slot.
///
/// A slot is `Open` while its request is pending. Resolution moves exactly
/// one slot to `Consumed` (on accept) and every other slot to `Voided`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    #[default]
    Open,
    Consumed,
    Voided,
}

impl SlotState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Consumed => "consumed",
            Self::Voided => "voided",
        }
    }
}

impl FromStr for SlotState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "consumed" => Ok(Self::Consumed),
            "voided" => Ok(Self::Voided),
            _ => Err(DomainError::InvalidSlotState(s.to_string())),
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse part of the day used for availability preferences.
///
/// Bands are half-open: morning is `[05:00, 12:00)`, afternoon
/// `[12:00, 17:00)` and evening `[17:00, 24:00)`. Times before 05:00 fall
/// into no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    Morning,
    Afternoon,
    Evening,
}

impl TimeBand {
    /// Classifies a wall-clock time into a band.
    #[must_use]
    pub const fn of(time: Time) -> Option<Self> {
        match time.hour() {
            5..=11 => Some(Self::Morning),
            12..=16 => Some(Self::Afternoon),
            17..=23 => Some(Self::Evening),
            _ => None,
        }
    }

    /// Returns the string representation of the band.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

impl FromStr for TimeBand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            _ => Err(DomainError::InvalidTimeBand(s.to_string())),
        }
    }
}

/// A slot as composed by the proposer, before it belongs to a request.
///
/// The identifier is optional; the engine mints one when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDraft {
    pub id: Option<SlotId>,
    pub date: Date,
    pub time: Time,
    pub duration_minutes: u16,
    pub mode: SlotMode,
    pub location: Option<String>,
}

impl SlotDraft {
    /// Creates a draft without an identifier.
    #[must_use]
    pub const fn new(
        date: Date,
        time: Time,
        duration_minutes: u16,
        mode: SlotMode,
        location: Option<String>,
    ) -> Self {
        Self {
            id: None,
            date,
            time,
            duration_minutes,
            mode,
            location,
        }
    }

    /// Sets a caller-chosen identifier.
    #[must_use]
    pub fn with_id(mut self, id: SlotId) -> Self {
        self.id = Some(id);
        self
    }
}

/// One proposed interview opportunity within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub date: Date,
    pub time: Time,
    pub duration_minutes: u16,
    pub mode: SlotMode,
    pub location: Option<String>,
    pub state: SlotState,
}

impl TimeSlot {
    /// Builds an open slot from a draft and its resolved identifier.
    #[must_use]
    pub fn open(id: SlotId, draft: SlotDraft) -> Self {
        Self {
            id,
            date: draft.date,
            time: draft.time,
            duration_minutes: draft.duration_minutes,
            mode: draft.mode,
            location: draft.location,
            state: SlotState::Open,
        }
    }

    /// Returns true while the slot can still be accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SlotState::Open
    }

    /// Returns the location with surrounding whitespace removed, if any text remains.
    #[must_use]
    pub fn trimmed_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
    }
}
