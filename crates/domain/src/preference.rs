// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Responder availability preferences.
//!
//! Preferences are advisory. They influence how candidate slots are ordered
//! when a proposer composes a request and never block a valid operation.

use crate::error::DomainError;
use crate::slot::TimeBand;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::{Date, Time, Weekday};

/// Timezone assumed when a responder has not stated one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Returns the day a calendar date falls on.
    #[must_use]
    pub const fn of(date: Date) -> Self {
        match date.weekday() {
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
            Weekday::Sunday => Self::Sunday,
        }
    }

    /// Returns the string representation of the day.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "tuesday" | "tue" => Ok(Self::Tuesday),
            "wednesday" | "wed" => Ok(Self::Wednesday),
            "thursday" | "thu" => Ok(Self::Thursday),
            "friday" | "fri" => Ok(Self::Friday),
            "saturday" | "sat" => Ok(Self::Saturday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(DomainError::InvalidDayOfWeek(s.to_string())),
        }
    }
}

/// A responder's preferred days, parts of day, and timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityPreference {
    pub responder_id: UserId,
    pub preferred_days: BTreeSet<DayOfWeek>,
    pub preferred_time_bands: BTreeSet<TimeBand>,
    /// IANA zone name, e.g. `Europe/Berlin`.
    timezone: String,
}

impl AvailabilityPreference {
    /// Creates a preference, validating the timezone name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if `timezone` is not a known IANA zone.
    pub fn new(
        responder_id: UserId,
        preferred_days: BTreeSet<DayOfWeek>,
        preferred_time_bands: BTreeSet<TimeBand>,
        timezone: &str,
    ) -> Result<Self, DomainError> {
        let timezone = timezone.trim();
        timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;

        Ok(Self {
            responder_id,
            preferred_days,
            preferred_time_bands,
            timezone: timezone.to_string(),
        })
    }

    /// The preference returned for a responder who never set one:
    /// no preferred days, no preferred bands, UTC.
    #[must_use]
    pub fn default_for(responder_id: UserId) -> Self {
        Self {
            responder_id,
            preferred_days: BTreeSet::new(),
            preferred_time_bands: BTreeSet::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Returns true if the date falls on a preferred day.
    #[must_use]
    pub fn matches_day(&self, date: Date) -> bool {
        self.preferred_days.contains(&DayOfWeek::of(date))
    }

    /// Returns true if the time falls in a preferred band.
    #[must_use]
    pub fn matches_band(&self, time: Time) -> bool {
        TimeBand::of(time).is_some_and(|band| self.preferred_time_bands.contains(&band))
    }

    /// Number of preference criteria (day, band) a slot satisfies, 0 to 2.
    #[must_use]
    pub fn match_score(&self, date: Date, time: Time) -> u8 {
        u8::from(self.matches_day(date)) + u8::from(self.matches_band(time))
    }
}
