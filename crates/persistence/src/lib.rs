// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage for interview slot negotiation.
//!
//! This crate owns the request repository, the confirmed interview registry,
//! the availability preference store and the event outbox. Each store is a
//! trait so the negotiation engine can be wired to any backend; the
//! in-process implementations here are what the engine and its tests use.
//!
//! ## Concurrency
//!
//! - Every store guards its table with its own lock and never calls out
//!   while holding it
//! - Reads clone the rows they return, so callers hold no lock afterwards
//! - Serializing resolutions of one request is the engine's job; the request
//!   repository backs it up with a compare-and-swap on the stored status
//!
//! ## Snapshots
//!
//! `InMemoryStore::snapshot` and `InMemoryStore::restore` move the full state
//! in and out of a `StoreSnapshot`, which round-trips through JSON.

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
mod interviews;
mod outbox;
mod preferences;
mod requests;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use interviews::{InMemoryInterviewRegistry, InterviewRegistry};
pub use outbox::{EventOutbox, InMemoryEventOutbox};
pub use preferences::{InMemoryPreferenceStore, PreferenceStore};
pub use requests::{InMemoryRequestRepository, RequestRepository};
pub use snapshot::{InMemoryStore, StoreSnapshot};
