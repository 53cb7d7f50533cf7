// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Negotiation engine for two-party interview scheduling.
//!
//! A proposer offers a bundle of candidate slots; the responder accepts
//! exactly one or declines the whole bundle. Resolution is exclusive: once a
//! request leaves `pending`, no further accept or decline can land, and an
//! accepted request owns exactly one confirmed interview.

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

mod apply;
mod command;
mod config;
mod engine;
mod error;
mod locks;
mod ports;
mod propose;

#[cfg(test)]
mod tests;

pub use apply::{apply_resolution, confirm_interview};
pub use command::{NewRequest, ResolveAction};
pub use config::{DEFAULT_MAX_DELIVERY_ATTEMPTS, EngineConfig};
pub use engine::{NegotiationEngine, ResolutionOutcome, Stores};
pub use error::CoreError;
pub use ports::{Clock, IdSource, RandomIdSource, SystemClock};
pub use propose::{Schedulable, propose_slots};
