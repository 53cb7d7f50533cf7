// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_pending_request, create_test_engine, create_test_request, create_test_slot,
};
use crate::{
    ApiError, ListRequestsQuery, ResolveRequestRequest, create_request, get_interview,
    get_request, list_requests, list_user_interviews, redeliver_events, resolve_request,
};

fn accept(slot_id: &str) -> ResolveRequestRequest {
    ResolveRequestRequest {
        slot_id: String::from(slot_id),
        action: String::from("accept"),
    }
}

fn decline(slot_id: &str) -> ResolveRequestRequest {
    ResolveRequestRequest {
        slot_id: String::from(slot_id),
        action: String::from("decline"),
    }
}

#[test]
fn test_create_request_returns_pending_request() {
    let (engine, _sink) = create_test_engine();

    let info = create_pending_request(&engine);

    assert!(info.request_id.starts_with("req_"));
    assert_eq!(info.status, "pending");
    assert_eq!(info.proposer_id, "E");
    assert_eq!(info.responder_id, "C");
    assert_eq!(info.slots.len(), 2);
    assert_eq!(info.slots[0].slot_id, "S1");
    assert_eq!(info.slots[0].date, "2024-01-25");
    assert_eq!(info.slots[0].time, "10:00");
    assert_eq!(info.slots[0].mode, "video");
    assert!(info.slots.iter().all(|slot| slot.state == "open"));
    assert_eq!(get_request(&engine, &info.request_id).unwrap(), info);
}

#[test]
fn test_create_request_assigns_slot_ids() {
    let (engine, _sink) = create_test_engine();
    let mut request = create_test_request();
    request.slots[1].id = None;

    let info = create_request(&engine, request).unwrap();

    assert_eq!(info.slots[0].slot_id, "S1");
    assert!(info.slots[1].slot_id.starts_with("slot_"));
}

#[test]
fn test_create_request_rejects_bad_date() {
    let (engine, _sink) = create_test_engine();
    let mut request = create_test_request();
    request.slots[1].date = String::from("25/01/2024");

    let result = create_request(&engine, request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "slots[1].date"
    ));
}

#[test]
fn test_create_request_rejects_bad_time_and_mode() {
    let (engine, _sink) = create_test_engine();

    let mut bad_time = create_test_request();
    bad_time.slots[0].time = String::from("10am");
    assert!(matches!(
        create_request(&engine, bad_time),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "slots[0].time"
    ));

    let mut bad_mode = create_test_request();
    bad_mode.slots[0].mode = String::from("carrier_pigeon");
    assert!(matches!(
        create_request(&engine, bad_mode),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "slots[0].mode"
    ));
}

#[test]
fn test_in_person_without_location_is_invalid_input() {
    let (engine, _sink) = create_test_engine();
    let mut slot = create_test_slot("S1", "09:30");
    slot.mode = String::from("in_person");
    let mut request = create_test_request();
    request.slots = vec![slot];

    let result = create_request(&engine, request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "location"
    ));
}

#[test]
fn test_accept_returns_confirmed_interview() {
    let (engine, sink) = create_test_engine();
    let info = create_pending_request(&engine);

    let response = resolve_request(&engine, &info.request_id, &accept("S2")).unwrap();

    assert_eq!(response.request.status, "accepted");
    assert_eq!(response.request.slots[0].state, "voided");
    assert_eq!(response.request.slots[1].state, "consumed");
    assert!(response.notified);
    assert_eq!(sink.len(), 1);

    let interview = response.confirmed_interview.unwrap();
    assert_eq!(interview.slot_id, "S2");
    assert_eq!(interview.time, "14:00");
    assert!(
        interview
            .meeting_reference
            .as_deref()
            .is_some_and(|reference| !reference.is_empty())
    );
    assert_eq!(
        get_interview(&engine, &interview.interview_id).unwrap(),
        interview
    );

    let feed = list_user_interviews(&engine, "E").unwrap();
    assert_eq!(feed.user_id, "E");
    assert_eq!(feed.interviews, vec![interview]);
}

#[test]
fn test_second_resolution_is_already_resolved() {
    let (engine, _sink) = create_test_engine();
    let info = create_pending_request(&engine);
    resolve_request(&engine, &info.request_id, &accept("S2")).unwrap();

    let result = resolve_request(&engine, &info.request_id, &decline("S1"));

    assert_eq!(
        result,
        Err(ApiError::AlreadyResolved {
            request_id: info.request_id.clone(),
            status: String::from("accepted"),
        })
    );
    let stored = get_request(&engine, &info.request_id).unwrap();
    assert_eq!(stored.slots[0].state, "voided");
}

#[test]
fn test_decline_has_no_interview() {
    let (engine, _sink) = create_test_engine();
    let info = create_pending_request(&engine);

    let response = resolve_request(&engine, &info.request_id, &decline("S1")).unwrap();

    assert_eq!(response.request.status, "declined");
    assert_eq!(response.confirmed_interview, None);
    assert!(list_user_interviews(&engine, "C").unwrap().interviews.is_empty());
}

#[test]
fn test_resolve_error_translation() {
    let (engine, _sink) = create_test_engine();
    let info = create_pending_request(&engine);

    assert!(matches!(
        resolve_request(&engine, "missing", &accept("S1")),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert_eq!(
        resolve_request(&engine, &info.request_id, &accept("S9")),
        Err(ApiError::SlotUnavailable {
            request_id: info.request_id.clone(),
            slot_id: String::from("S9"),
        })
    );
    let maybe = ResolveRequestRequest {
        slot_id: String::from("S1"),
        action: String::from("maybe"),
    };
    assert!(matches!(
        resolve_request(&engine, &info.request_id, &maybe),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "action"
    ));
    assert_eq!(get_request(&engine, &info.request_id).unwrap().status, "pending");
}

#[test]
fn test_list_requests_by_party() {
    let (engine, _sink) = create_test_engine();
    let first = create_pending_request(&engine);
    let second = create_pending_request(&engine);
    resolve_request(&engine, &first.request_id, &decline("S1")).unwrap();

    let all = list_requests(
        &engine,
        &ListRequestsQuery {
            responder: Some(String::from("C")),
            ..ListRequestsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(all.requests.len(), 2);

    let pending = list_requests(
        &engine,
        &ListRequestsQuery {
            responder: Some(String::from("C")),
            pending_only: true,
            ..ListRequestsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(pending.requests.len(), 1);
    assert_eq!(pending.requests[0].request_id, second.request_id);

    let issued = list_requests(
        &engine,
        &ListRequestsQuery {
            proposer: Some(String::from("E")),
            ..ListRequestsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(issued.requests.len(), 2);
}

#[test]
fn test_list_requests_requires_one_party() {
    let (engine, _sink) = create_test_engine();

    let neither = list_requests(&engine, &ListRequestsQuery::default());
    let both = list_requests(
        &engine,
        &ListRequestsQuery {
            responder: Some(String::from("C")),
            proposer: Some(String::from("E")),
            pending_only: false,
        },
    );

    assert!(matches!(neither, Err(ApiError::InvalidInput { .. })));
    assert!(matches!(both, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_redeliver_with_nothing_pending() {
    let (engine, _sink) = create_test_engine();
    let info = create_pending_request(&engine);
    resolve_request(&engine, &info.request_id, &accept("S1")).unwrap();

    assert_eq!(redeliver_events(&engine).unwrap().delivered, 0);
}

#[test]
fn test_dto_json_shape() {
    let json = r#"{
        "proposer_id": "E",
        "responder_id": "C",
        "job_title": "Backend Engineer",
        "slots": [
            {"date": "2024-01-25", "time": "10:00", "duration_minutes": 30, "mode": "phone"}
        ]
    }"#;

    let request: crate::CreateInterviewRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.message, None);
    assert_eq!(request.slots[0].id, None);
    assert_eq!(request.slots[0].location, None);
}
