// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advisory ordering of candidate slots against a responder's preferences.

use interview_negotiation_domain::{AvailabilityPreference, SlotDraft, TimeSlot};
use time::{Date, Time};

/// Anything with wall-clock scheduling coordinates.
pub trait Schedulable {
    fn date(&self) -> Date;
    fn time(&self) -> Time;
}

impl Schedulable for SlotDraft {
    fn date(&self) -> Date {
        self.date
    }

    fn time(&self) -> Time {
        self.time
    }
}

impl Schedulable for TimeSlot {
    fn date(&self) -> Date {
        self.date
    }

    fn time(&self) -> Time {
        self.time
    }
}

/// Reorders candidate slots so those matching the preference come first.
///
/// Slots are ranked by how many criteria they meet (preferred day, preferred
/// time band), most first, then by date and time, earliest first. Slots with
/// equal keys keep their input order. Nothing is added or removed.
#[must_use]
pub fn propose_slots<T: Schedulable>(
    preference: &AvailabilityPreference,
    candidates: Vec<T>,
) -> Vec<T> {
    let mut ranked: Vec<(u8, T)> = candidates
        .into_iter()
        .map(|slot| (preference.match_score(slot.date(), slot.time()), slot))
        .collect();

    ranked.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| (a.date(), a.time()).cmp(&(b.date(), b.time())))
    });

    ranked.into_iter().map(|(_, slot)| slot).collect()
}
