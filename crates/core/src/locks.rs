// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-request mutual exclusion.
//!
//! Each request id maps to its own mutex, so resolutions of different
//! requests never wait on each other. Entries are dropped once nobody holds
//! or waits on them.

use interview_negotiation_domain::RequestId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct RequestLocks {
    entries: Mutex<HashMap<RequestId, Arc<Mutex<()>>>>,
}

impl RequestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `id`.
    pub fn with_lock<T>(&self, id: &RequestId, f: impl FnOnce() -> T) -> T {
        let handle: Arc<Mutex<()>> = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(id.clone()).or_default())
        };

        let result: T = {
            // The mutex guards no data, so a poisoned lock is still usable.
            let _held = handle.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(handle);

        // Cloning a handle happens under the map lock, so a count of one here
        // means no other caller holds or is about to take this mutex.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            entries.remove(id);
        }

        result
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
