// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Clock, EngineConfig, IdSource, NegotiationEngine, NewRequest, Stores};
use interview_negotiation_domain::{
    ConfirmedInterview, InterviewId, InterviewRequest, RequestId, SlotDraft, SlotId, SlotMode,
    UserId,
};
use interview_negotiation_events::{
    NotificationSink, RecordingSink, ResolutionEvent, SinkError,
};
use interview_negotiation_persistence::{
    EventOutbox, InMemoryEventOutbox, InMemoryInterviewRegistry, InMemoryStore,
    InterviewRegistry, PersistenceError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use time::macros::{date, datetime, time};
use time::{Duration, OffsetDateTime, Time};

/// Clock that starts at a fixed instant and moves one second per reading.
#[derive(Debug)]
pub struct SteppingClock {
    start: OffsetDateTime,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            start: datetime!(2024-01-20 09:00 UTC),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        self.start + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

/// Deterministic identifiers: `req-1`, `slot-2`, `int-3`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl IdSource for SequentialIds {
    fn next_request_id(&self) -> RequestId {
        RequestId::new(format!("req-{}", self.bump()))
    }

    fn next_slot_id(&self) -> SlotId {
        SlotId::new(format!("slot-{}", self.bump()))
    }

    fn next_interview_id(&self) -> InterviewId {
        InterviewId::new(format!("int-{}", self.bump()))
    }

    fn next_event_id(&self) -> String {
        format!("evt-{}", self.bump())
    }

    fn meeting_token(&self) -> String {
        format!("token-{}", self.bump())
    }
}

/// Sink that reports `Unavailable` for the first `failures` offers.
#[derive(Debug)]
pub struct FlakySink {
    remaining_failures: AtomicU32,
    pub inner: RecordingSink,
}

impl FlakySink {
    pub fn failing(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
            inner: RecordingSink::new(),
        }
    }
}

impl NotificationSink for FlakySink {
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError> {
        let remaining = self.remaining_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(SinkError::Unavailable(String::from("downstream offline")));
        }
        self.inner.deliver(event)
    }
}

/// Sink that refuses every event outright.
#[derive(Debug, Default)]
pub struct RejectingSink;

impl NotificationSink for RejectingSink {
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError> {
        Err(SinkError::Rejected {
            event_id: event.event_id.clone(),
            reason: String::from("unsupported event"),
        })
    }
}

/// Registry whose first `failures` calls to `add` fail.
#[derive(Debug)]
pub struct FailingRegistry {
    remaining_failures: AtomicU32,
    pub inner: InMemoryInterviewRegistry,
}

impl FailingRegistry {
    pub fn failing(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
            inner: InMemoryInterviewRegistry::new(),
        }
    }
}

impl InterviewRegistry for FailingRegistry {
    fn add(&self, record: ConfirmedInterview) -> Result<(), PersistenceError> {
        if take_failure(&self.remaining_failures) {
            return Err(PersistenceError::LockPoisoned("interviews"));
        }
        self.inner.add(record)
    }

    fn get(&self, id: &InterviewId) -> Result<ConfirmedInterview, PersistenceError> {
        self.inner.get(id)
    }

    fn list_by_user(&self, user_id: &UserId) -> Result<Vec<ConfirmedInterview>, PersistenceError> {
        self.inner.list_by_user(user_id)
    }

    fn find_by_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<ConfirmedInterview>, PersistenceError> {
        self.inner.find_by_request(request_id)
    }

    fn remove(&self, id: &InterviewId) -> Result<(), PersistenceError> {
        self.inner.remove(id)
    }
}

/// Outbox whose first `failures` calls to `enqueue` fail.
#[derive(Debug)]
pub struct FailingOutbox {
    remaining_failures: AtomicU32,
    pub inner: InMemoryEventOutbox,
}

impl FailingOutbox {
    pub fn failing(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
            inner: InMemoryEventOutbox::new(),
        }
    }
}

impl EventOutbox for FailingOutbox {
    fn enqueue(&self, event: ResolutionEvent) -> Result<(), PersistenceError> {
        if take_failure(&self.remaining_failures) {
            return Err(PersistenceError::LockPoisoned("outbox"));
        }
        self.inner.enqueue(event)
    }

    fn acknowledge(&self, event_id: &str) -> Result<(), PersistenceError> {
        self.inner.acknowledge(event_id)
    }

    fn pending(&self) -> Result<Vec<ResolutionEvent>, PersistenceError> {
        self.inner.pending()
    }
}

fn take_failure(remaining: &AtomicU32) -> bool {
    remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

pub struct TestHarness {
    pub engine: NegotiationEngine,
    pub store: InMemoryStore,
    pub sink: Arc<RecordingSink>,
}

pub fn create_test_harness() -> TestHarness {
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::new());
    let (engine, store) = create_engine_with_sink(sink.clone(), EngineConfig::default());
    TestHarness {
        engine,
        store,
        sink,
    }
}

pub fn create_engine_with_sink(
    sink: Arc<dyn NotificationSink>,
    config: EngineConfig,
) -> (NegotiationEngine, InMemoryStore) {
    let store: InMemoryStore = InMemoryStore::new();
    let engine: NegotiationEngine = NegotiationEngine::new(Stores::from(&store), sink, config)
        .with_clock(Arc::new(SteppingClock::new()))
        .with_id_source(Arc::new(SequentialIds::default()));
    (engine, store)
}

/// Engine over caller-supplied stores, with the test clock and ids.
pub fn create_engine_with_stores(
    stores: Stores,
    sink: Arc<dyn NotificationSink>,
) -> NegotiationEngine {
    NegotiationEngine::new(stores, sink, EngineConfig::default())
        .with_clock(Arc::new(SteppingClock::new()))
        .with_id_source(Arc::new(SequentialIds::default()))
}

pub fn video_slot(id: &str, time: Time) -> SlotDraft {
    SlotDraft::new(date!(2024 - 01 - 25), time, 45, SlotMode::Video, None)
        .with_id(SlotId::new(id))
}

/// Two video slots on Thursday 2024-01-25: `S1` at 10:00 and `S2` at 14:00.
pub fn create_two_slot_request() -> NewRequest {
    NewRequest {
        proposer_id: UserId::new("E"),
        responder_id: UserId::new("C"),
        job_title: String::from("Backend Engineer"),
        message: Some(String::from("Looking forward to it")),
        slots: vec![video_slot("S1", time!(10:00)), video_slot("S2", time!(14:00))],
    }
}

pub fn create_pending(engine: &NegotiationEngine) -> InterviewRequest {
    let id: RequestId = engine
        .create_request(create_two_slot_request())
        .expect("request should be created");
    engine.get_request(&id).expect("request should exist")
}
