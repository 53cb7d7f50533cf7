// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use interview_negotiation_domain::{AvailabilityPreference, UserId};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Per-responder availability preferences.
pub trait PreferenceStore: Send + Sync {
    /// The responder's preference, or the empty UTC default if none was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, responder_id: &UserId) -> Result<AvailabilityPreference, PersistenceError>;

    /// Replaces the responder's preference wholesale. Nothing is merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(
        &self,
        responder_id: &UserId,
        preference: AvailabilityPreference,
    ) -> Result<(), PersistenceError>;
}

/// In-process `PreferenceStore`.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    entries: RwLock<HashMap<UserId, AvailabilityPreference>>,
}

impl InMemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every explicitly stored preference, ordered by responder id.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if the store cannot be read.
    pub fn all(&self) -> Result<Vec<AvailabilityPreference>, PersistenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("preferences"))?;
        let mut all: Vec<AvailabilityPreference> = entries.values().cloned().collect();
        all.sort_by(|a, b| a.responder_id.cmp(&b.responder_id));
        Ok(all)
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, responder_id: &UserId) -> Result<AvailabilityPreference, PersistenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("preferences"))?;
        Ok(entries.get(responder_id).cloned().unwrap_or_else(|| {
            AvailabilityPreference::default_for(responder_id.clone())
        }))
    }

    fn set(
        &self,
        responder_id: &UserId,
        mut preference: AvailabilityPreference,
    ) -> Result<(), PersistenceError> {
        // The key wins over whatever id the caller put in the body.
        preference.responder_id = responder_id.clone();
        debug!(
            responder_id = %responder_id,
            days = preference.preferred_days.len(),
            bands = preference.preferred_time_bands.len(),
            timezone = preference.timezone(),
            "Replaced availability preference"
        );
        self.entries
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("preferences"))?
            .insert(responder_id.clone(), preference);
        Ok(())
    }
}
