// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use interview_negotiation::{EngineConfig, NegotiationEngine, Stores};
use interview_negotiation_api::{
    ApiError, CreateInterviewRequest, InterviewInfo, ListInterviewsResponse, ListRequestsQuery,
    ListRequestsResponse, PreferenceInfo, ProposeSlotsRequest, ProposeSlotsResponse,
    RedeliverEventsResponse, RequestInfo, ResolveRequestRequest, ResolveRequestResponse,
    SetPreferenceRequest, create_request, get_interview, get_preference, get_request,
    list_requests, list_user_interviews, propose_slots, redeliver_events, resolve_request,
    set_preference,
};
use interview_negotiation_persistence::{InMemoryStore, PersistenceError, StoreSnapshot};
use live::{LiveEventBroadcaster, live_events_handler};
use serde::{Deserialize, Serialize};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Interview negotiation server - HTTP host for the negotiation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON snapshot loaded at start and written at shutdown.
    /// If not provided, state lives in memory only.
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    /// Base URL for video meeting references, e.g. `https://meet.example.com`
    #[arg(long)]
    meeting_link_base: Option<String>,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The negotiation engine.
    engine: Arc<NegotiationEngine>,
    /// The stores behind the engine, kept for snapshotting.
    store: InMemoryStore,
    /// Live resolution stream; also the engine's notification sink.
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

impl AppState {
    fn new(store: InMemoryStore, config: EngineConfig) -> Self {
        let broadcaster: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
        let engine: NegotiationEngine =
            NegotiationEngine::new(Stores::from(&store), broadcaster.clone(), config);
        Self {
            engine: Arc::new(engine),
            store,
            broadcaster,
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::SlotUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::AlreadyResolved { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/requests`.
async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<RequestInfo>), HttpError> {
    info!(
        proposer_id = %req.proposer_id,
        responder_id = %req.responder_id,
        slots = req.slots.len(),
        "Handling create_request"
    );
    let info: RequestInfo = create_request(&app_state.engine, req)?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for GET `/requests?responder=…` or `?proposer=…`.
async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    Ok(Json(list_requests(&app_state.engine, &query)?))
}

/// Handler for GET `/requests/{request_id}`.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<RequestInfo>, HttpError> {
    Ok(Json(get_request(&app_state.engine, &request_id)?))
}

/// Handler for POST `/requests/{request_id}/resolve`.
async fn handle_resolve_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<String>,
    Json(req): Json<ResolveRequestRequest>,
) -> Result<Json<ResolveRequestResponse>, HttpError> {
    info!(
        request_id = %request_id,
        slot_id = %req.slot_id,
        action = %req.action,
        "Handling resolve_request"
    );
    Ok(Json(resolve_request(&app_state.engine, &request_id, &req)?))
}

/// Handler for GET `/interviews/{interview_id}`.
async fn handle_get_interview(
    AxumState(app_state): AxumState<AppState>,
    Path(interview_id): Path<String>,
) -> Result<Json<InterviewInfo>, HttpError> {
    Ok(Json(get_interview(&app_state.engine, &interview_id)?))
}

/// Handler for GET `/users/{user_id}/interviews`.
async fn handle_list_user_interviews(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ListInterviewsResponse>, HttpError> {
    Ok(Json(list_user_interviews(&app_state.engine, &user_id)?))
}

/// Handler for GET `/preferences/{responder_id}`.
async fn handle_get_preference(
    AxumState(app_state): AxumState<AppState>,
    Path(responder_id): Path<String>,
) -> Result<Json<PreferenceInfo>, HttpError> {
    Ok(Json(get_preference(&app_state.engine, &responder_id)?))
}

/// Handler for PUT `/preferences/{responder_id}`.
async fn handle_set_preference(
    AxumState(app_state): AxumState<AppState>,
    Path(responder_id): Path<String>,
    Json(req): Json<SetPreferenceRequest>,
) -> Result<Json<PreferenceInfo>, HttpError> {
    Ok(Json(set_preference(&app_state.engine, &responder_id, &req)?))
}

/// Handler for POST `/preferences/{responder_id}/propose`.
async fn handle_propose_slots(
    AxumState(app_state): AxumState<AppState>,
    Path(responder_id): Path<String>,
    Json(req): Json<ProposeSlotsRequest>,
) -> Result<Json<ProposeSlotsResponse>, HttpError> {
    Ok(Json(propose_slots(&app_state.engine, &responder_id, &req)?))
}

/// Handler for POST `/events/redeliver`.
async fn handle_redeliver_events(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RedeliverEventsResponse>, HttpError> {
    Ok(Json(redeliver_events(&app_state.engine)?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/requests",
            post(handle_create_request).get(handle_list_requests),
        )
        .route("/requests/{request_id}", get(handle_get_request))
        .route(
            "/requests/{request_id}/resolve",
            post(handle_resolve_request),
        )
        .route("/interviews/{interview_id}", get(handle_get_interview))
        .route(
            "/users/{user_id}/interviews",
            get(handle_list_user_interviews),
        )
        .route(
            "/preferences/{responder_id}",
            get(handle_get_preference).put(handle_set_preference),
        )
        .route(
            "/preferences/{responder_id}/propose",
            post(handle_propose_slots),
        )
        .route("/events/redeliver", post(handle_redeliver_events))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Loads the snapshot at `path`, or starts empty if the file does not exist.
fn load_store(path: &FsPath) -> Result<InMemoryStore, PersistenceError> {
    if !path.exists() {
        info!(path = %path.display(), "No state file yet; starting empty");
        return Ok(InMemoryStore::new());
    }

    let json: String = std::fs::read_to_string(path)
        .map_err(|e| PersistenceError::InvalidSnapshot(format!("{}: {e}", path.display())))?;
    let store: InMemoryStore = InMemoryStore::restore(StoreSnapshot::from_json(&json)?)?;
    info!(path = %path.display(), "Restored state from file");
    Ok(store)
}

fn save_store(store: &InMemoryStore, path: &FsPath) -> Result<(), Box<dyn std::error::Error>> {
    let json: String = store.snapshot()?.to_json()?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Saved state to file");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("Initializing interview negotiation server");

    let store: InMemoryStore = match &args.state_file {
        Some(path) => load_store(path)?,
        None => {
            info!("Using in-memory state");
            InMemoryStore::new()
        }
    };

    let config: EngineConfig = EngineConfig {
        meeting_link_base: args.meeting_link_base.clone(),
        ..EngineConfig::default()
    };
    let app_state: AppState = AppState::new(store, config);

    // Events left undelivered by a previous run.
    match app_state.engine.redeliver_pending() {
        Ok(0) => {}
        Ok(delivered) => info!(delivered, "Redelivered pending events"),
        Err(e) => warn!(error = %e, "Could not redeliver pending events"),
    }

    let app: Router = build_router(app_state.clone());

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &args.state_file {
        save_store(&app_state.store, path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use interview_negotiation_api::SlotInput;
    use tower::ServiceExt;

    fn create_test_app_state() -> AppState {
        AppState::new(InMemoryStore::new(), EngineConfig::default())
    }

    fn create_test_request_body() -> CreateInterviewRequest {
        let slot = |id: &str, time: &str| SlotInput {
            id: Some(id.to_string()),
            date: String::from("2024-01-25"),
            time: time.to_string(),
            duration_minutes: 45,
            mode: String::from("video"),
            location: None,
        };
        CreateInterviewRequest {
            proposer_id: String::from("E"),
            responder_id: String::from("C"),
            job_title: String::from("Backend Engineer"),
            message: None,
            slots: vec![slot("S1", "10:00"), slot("S2", "14:00")],
        }
    }

    fn json_request<T: Serialize>(method: &str, uri: &str, body: &T) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn get_request_to(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    async fn create_pending(app: &Router) -> RequestInfo {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/requests", &create_test_request_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        read_json(response).await
    }

    fn resolve_body(slot_id: &str, action: &str) -> ResolveRequestRequest {
        ResolveRequestRequest {
            slot_id: slot_id.to_string(),
            action: action.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_request() {
        let app: Router = build_router(create_test_app_state());

        let created: RequestInfo = create_pending(&app).await;
        let response = app
            .oneshot(get_request_to(&format!("/requests/{}", created.request_id)))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let fetched: RequestInfo = read_json(response).await;
        assert_eq!(fetched, created);
        assert_eq!(fetched.status, "pending");
    }

    #[tokio::test]
    async fn test_accept_then_decline_conflicts() {
        let app: Router = build_router(create_test_app_state());
        let created: RequestInfo = create_pending(&app).await;
        let uri: String = format!("/requests/{}/resolve", created.request_id);

        let accepted = app
            .clone()
            .oneshot(json_request("POST", &uri, &resolve_body("S2", "accept")))
            .await
            .unwrap();
        assert_eq!(accepted.status(), HttpStatusCode::OK);
        let body: ResolveRequestResponse = read_json(accepted).await;
        let interview: InterviewInfo = body.confirmed_interview.unwrap();
        assert_eq!(interview.slot_id, "S2");

        let declined = app
            .clone()
            .oneshot(json_request("POST", &uri, &resolve_body("S1", "decline")))
            .await
            .unwrap();
        assert_eq!(declined.status(), HttpStatusCode::CONFLICT);
        let error: ErrorResponse = read_json(declined).await;
        assert!(error.error);

        let feed = app
            .oneshot(get_request_to("/users/C/interviews"))
            .await
            .unwrap();
        let feed: ListInterviewsResponse = read_json(feed).await;
        assert_eq!(feed.interviews, vec![interview]);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app: Router = build_router(create_test_app_state());
        let created: RequestInfo = create_pending(&app).await;

        let missing = app
            .clone()
            .oneshot(get_request_to("/requests/nope"))
            .await
            .unwrap();
        assert_eq!(missing.status(), HttpStatusCode::NOT_FOUND);

        let unknown_slot = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/requests/{}/resolve", created.request_id),
                &resolve_body("S9", "accept"),
            ))
            .await
            .unwrap();
        assert_eq!(unknown_slot.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let mut bad = create_test_request_body();
        bad.slots[0].mode = String::from("in_person");
        let invalid = app
            .clone()
            .oneshot(json_request("POST", "/requests", &bad))
            .await
            .unwrap();
        assert_eq!(invalid.status(), HttpStatusCode::BAD_REQUEST);

        let no_party = app.oneshot(get_request_to("/requests")).await.unwrap();
        assert_eq!(no_party.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_pending_for_responder() {
        let app: Router = build_router(create_test_app_state());
        let first: RequestInfo = create_pending(&app).await;
        let second: RequestInfo = create_pending(&app).await;
        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/requests/{}/resolve", first.request_id),
                &resolve_body("S1", "decline"),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request_to("/requests?responder=C&pending_only=true"))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let list: ListRequestsResponse = read_json(response).await;
        assert_eq!(list.requests.len(), 1);
        assert_eq!(list.requests[0].request_id, second.request_id);
    }

    #[tokio::test]
    async fn test_preferences_round_trip_and_propose() {
        let app: Router = build_router(create_test_app_state());
        let preference = SetPreferenceRequest {
            preferred_days: vec![String::from("thursday")],
            preferred_time_bands: vec![String::from("afternoon")],
            timezone: Some(String::from("Europe/Berlin")),
        };

        let put = app
            .clone()
            .oneshot(json_request("PUT", "/preferences/C", &preference))
            .await
            .unwrap();
        assert_eq!(put.status(), HttpStatusCode::OK);

        let got: PreferenceInfo = read_json(
            app.clone()
                .oneshot(get_request_to("/preferences/C"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(got.timezone, "Europe/Berlin");
        assert_eq!(got.preferred_days, vec!["thursday"]);

        let candidates = ProposeSlotsRequest {
            slots: create_test_request_body().slots,
        };
        let ranked: ProposeSlotsResponse = read_json(
            app.oneshot(json_request("POST", "/preferences/C/propose", &candidates))
                .await
                .unwrap(),
        )
        .await;
        let ids: Vec<Option<String>> = ranked.slots.into_iter().map(|slot| slot.id).collect();
        assert_eq!(
            ids,
            vec![Some(String::from("S2")), Some(String::from("S1"))]
        );
    }

    #[tokio::test]
    async fn test_resolution_is_broadcast() {
        let app_state: AppState = create_test_app_state();
        let mut rx = app_state.broadcaster.subscribe();
        let app: Router = build_router(app_state);
        let created: RequestInfo = create_pending(&app).await;

        app.oneshot(json_request(
            "POST",
            &format!("/requests/{}/resolve", created.request_id),
            &resolve_body("S1", "decline"),
        ))
        .await
        .unwrap();

        match rx.try_recv() {
            Ok(live::LiveEvent::RequestDeclined { request_id, .. }) => {
                assert_eq!(request_id, created.request_id);
            }
            other => panic!("Expected RequestDeclined, got {other:?}"),
        }
    }

    #[test]
    fn test_state_file_round_trip() {
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "interview-negotiation-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join("state.json");
        let _ = std::fs::remove_file(&path);

        let empty: InMemoryStore = load_store(&path).unwrap();
        let app_state: AppState = AppState::new(empty, EngineConfig::default());
        let id = app_state
            .engine
            .create_request(interview_negotiation::NewRequest {
                proposer_id: "E".into(),
                responder_id: "C".into(),
                job_title: String::from("Backend Engineer"),
                message: None,
                slots: vec![interview_negotiation_domain::SlotDraft::new(
                    time::macros::date!(2024 - 01 - 25),
                    time::macros::time!(10:00),
                    30,
                    interview_negotiation_domain::SlotMode::Phone,
                    None,
                )],
            })
            .unwrap();
        save_store(&app_state.store, &path).unwrap();

        let restored: InMemoryStore = load_store(&path).unwrap();
        let reloaded: AppState = AppState::new(restored, EngineConfig::default());

        assert_eq!(
            reloaded.engine.get_request(&id).unwrap(),
            app_state.engine.get_request(&id).unwrap()
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
