// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live resolution streaming for connected clients.
//!
//! The broadcaster is the engine's notification sink: every resolution event
//! is logged and pushed to all WebSocket subscribers. Events are informational
//! only; clients read authoritative state over HTTP.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - No commands are executed over WebSocket connections
//! - A slow client loses the oldest buffered events, never blocks a resolve

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use interview_negotiation_events::{
    NotificationSink, ResolutionEvent, ResolutionKind, SinkError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live event types pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A responder accepted a slot.
    RequestAccepted {
        event_id: String,
        request_id: String,
        responder_id: String,
        proposer_id: String,
        confirmed_interview_id: Option<String>,
        timestamp: String,
    },
    /// A responder declined the bundle.
    RequestDeclined {
        event_id: String,
        request_id: String,
        responder_id: String,
        proposer_id: String,
        timestamp: String,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

impl From<&ResolutionEvent> for LiveEvent {
    fn from(event: &ResolutionEvent) -> Self {
        let timestamp: String = rfc3339(event.timestamp);
        match event.kind {
            ResolutionKind::RequestAccepted => Self::RequestAccepted {
                event_id: event.event_id.clone(),
                request_id: event.request_id.to_string(),
                responder_id: event.responder_id.to_string(),
                proposer_id: event.proposer_id.to_string(),
                confirmed_interview_id: event
                    .confirmed_interview_id
                    .as_ref()
                    .map(ToString::to_string),
                timestamp,
            },
            ResolutionKind::RequestDeclined => Self::RequestDeclined {
                event_id: event.event_id.clone(),
                request_id: event.request_id.to_string(),
                responder_id: event.responder_id.to_string(),
                proposer_id: event.proposer_id.to_string(),
                timestamp,
            },
        }
    }
}

fn rfc3339(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"))
}

/// Broadcaster for live resolution events.
///
/// This is a lightweight wrapper around `tokio::sync::broadcast` that allows
/// multiple WebSocket clients to receive resolution notifications.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is silently dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for LiveEventBroadcaster {
    fn deliver(&self, event: &ResolutionEvent) -> Result<(), SinkError> {
        info!(
            event_id = %event.event_id,
            kind = %event.kind,
            request_id = %event.request_id,
            responder_id = %event.responder_id,
            proposer_id = %event.proposer_id,
            "Resolution event"
        );
        self.broadcast(&LiveEvent::from(event));
        Ok(())
    }
}

/// Handles WebSocket upgrade requests for live event streaming.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Sends a connection confirmation, then streams live events until the
/// client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event = LiveEvent::Connected {
        timestamp: rfc3339(OffsetDateTime::now_utc()),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let event: LiveEvent = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live client lagged; events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                // Axum answers pings itself.
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live event stream");
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_negotiation_domain::{InterviewId, RequestId, UserId};
    use time::macros::datetime;

    fn accepted_event() -> ResolutionEvent {
        ResolutionEvent::accepted(
            String::from("evt-1"),
            RequestId::new("R1"),
            UserId::new("C"),
            UserId::new("E"),
            datetime!(2024-01-20 09:00 UTC),
            InterviewId::new("I1"),
        )
    }

    #[test]
    fn test_broadcaster_creation() {
        let broadcaster = LiveEventBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
    }

    #[test]
    fn test_delivery_without_receivers_succeeds() {
        let broadcaster = LiveEventBroadcaster::new();
        assert!(broadcaster.deliver(&accepted_event()).is_ok());
    }

    #[test]
    fn test_delivery_reaches_every_receiver() {
        let broadcaster = LiveEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.deliver(&accepted_event()).unwrap();

        let expected = LiveEvent::RequestAccepted {
            event_id: String::from("evt-1"),
            request_id: String::from("R1"),
            responder_id: String::from("C"),
            proposer_id: String::from("E"),
            confirmed_interview_id: Some(String::from("I1")),
            timestamp: String::from("2024-01-20T09:00:00Z"),
        };
        assert_eq!(rx1.try_recv().unwrap(), expected);
        assert_eq!(rx2.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_declined_event_serialization() {
        let event = LiveEvent::from(&ResolutionEvent::declined(
            String::from("evt-2"),
            RequestId::new("R2"),
            UserId::new("C"),
            UserId::new("E"),
            datetime!(2024-01-20 09:00 UTC),
        ));

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "request_declined");
        assert_eq!(json["request_id"], "R2");
        assert!(json.get("confirmed_interview_id").is_none());
    }
}
