// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use interview_negotiation::{EngineConfig, NegotiationEngine, Stores};
use interview_negotiation_events::RecordingSink;
use interview_negotiation_persistence::InMemoryStore;
use std::sync::Arc;

use crate::{CreateInterviewRequest, RequestInfo, SlotInput, create_request};

pub fn create_test_engine() -> (NegotiationEngine, Arc<RecordingSink>) {
    let store: InMemoryStore = InMemoryStore::new();
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::new());
    let engine: NegotiationEngine =
        NegotiationEngine::new(Stores::from(&store), sink.clone(), EngineConfig::default());
    (engine, sink)
}

pub fn create_test_slot(id: &str, time: &str) -> SlotInput {
    SlotInput {
        id: Some(String::from(id)),
        date: String::from("2024-01-25"),
        time: String::from(time),
        duration_minutes: 45,
        mode: String::from("video"),
        location: None,
    }
}

pub fn create_test_request() -> CreateInterviewRequest {
    CreateInterviewRequest {
        proposer_id: String::from("E"),
        responder_id: String::from("C"),
        job_title: String::from("Backend Engineer"),
        message: Some(String::from("Looking forward to it")),
        slots: vec![create_test_slot("S1", "10:00"), create_test_slot("S2", "14:00")],
    }
}

pub fn create_pending_request(engine: &NegotiationEngine) -> RequestInfo {
    create_request(engine, create_test_request()).unwrap()
}
