//! # Push Channel Endpoint
//!
//! WebSocket handler behind `GET /ws`.
//!
//! Each connection gets a `welcome`, then subscribes to the topics it wants.
//! Board changes are forwarded only for subscribed topics and never echoed
//! back to the connection that made them. A frame that fails to parse is
//! answered with an `error` frame; the connection stays open. A connection
//! that falls too far behind the broadcast is closed.

use std::collections::HashSet;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use board_core::{ClientFrame, ServerFrame, Topic};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::board::{Origin, SharedBoard};
use crate::metrics::{
    dec_ws_connections, inc_ws_connections, record_action, record_malformed_frame,
    record_ws_message,
};
use crate::AppState;

/// Upgrade to a push channel.
#[tracing::instrument(name = "websocket_connect", skip(ws, state))]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    tracing::debug!("WebSocket connection upgrade requested");
    ws.on_upgrade(move |socket| handle_board_socket(socket, state.board))
}

/// Per-connection subscription state.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    topics: HashSet<Topic>,
}

impl Connection {
    /// Create a connection with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            topics: HashSet::new(),
        }
    }

    /// Connection id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Whether `topic` is subscribed.
    #[must_use]
    pub fn is_subscribed(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// Handle one inbound text frame. Returns the direct reply, if any.
    pub fn handle_text(&mut self, text: &str, board: &SharedBoard) -> Option<ServerFrame> {
        let frame = match ClientFrame::from_json(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(client_id = %self.id, error = %e, "Malformed push frame");
                record_malformed_frame();
                return Some(ServerFrame::Error {
                    code: "parse_error".to_string(),
                    message: e.to_string(),
                });
            }
        };

        match frame {
            ClientFrame::Subscribe { topic } => {
                record_ws_message("inbound", "subscribe");
                self.topics.insert(topic);
                tracing::debug!(client_id = %self.id, ?topic, "Subscribed");
                Some(ServerFrame::Subscribed { topic })
            }
            ClientFrame::Draw { action } => {
                record_ws_message("inbound", "draw");
                record_action("push");
                board.add(action, Origin::Socket(self.id));
                None
            }
            ClientFrame::Clear => {
                record_ws_message("inbound", "clear");
                board.clear(Origin::Socket(self.id));
                None
            }
        }
    }

    /// The frame to forward for a broadcast, if this connection wants it.
    #[must_use]
    pub fn forward(&self, origin: Origin, frame: &ServerFrame) -> Option<ServerFrame> {
        if origin == Origin::Socket(self.id) {
            return None;
        }
        frame
            .topic()
            .filter(|topic| self.is_subscribed(*topic))
            .map(|_| frame.clone())
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive one push channel until either side closes it.
pub async fn handle_board_socket(socket: WebSocket, board: SharedBoard) {
    let (mut sender, mut receiver) = socket.split();
    let mut connection = Connection::new();
    let client_id = connection.id();

    // Subscribe before the welcome so nothing slips between the two
    let mut events = board.subscribe();
    inc_ws_connections();
    tracing::info!(client_id = %client_id, "Push channel opened");

    let welcome = ServerFrame::Welcome {
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    if send_frame(&mut sender, &welcome).await.is_err() {
        dec_ws_connections();
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = connection.handle_text(text.as_str(), &board) {
                            if send_frame(&mut sender, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!(client_id = %client_id, error = %e, "WebSocket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(frame) = connection.forward(event.origin, &event.frame) {
                            if send_frame(&mut sender, &frame).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // The client's board has diverged; closing makes it fall back to a snapshot
                        tracing::warn!(client_id = %client_id, skipped = n, "Push channel lagged behind, closing");
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    dec_ws_connections();
    tracing::info!(client_id = %client_id, "Push channel closed");
}

async fn send_frame(
    sender: &mut SplitSink<WebSocket, Message>,
    frame: &ServerFrame,
) -> Result<(), ()> {
    let json = match frame.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize server frame");
            return Ok(());
        }
    };
    record_ws_message("outbound", frame_type(frame));
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}

const fn frame_type(frame: &ServerFrame) -> &'static str {
    match frame {
        ServerFrame::Welcome { .. } => "welcome",
        ServerFrame::Subscribed { .. } => "subscribed",
        ServerFrame::Action { .. } => "action",
        ServerFrame::Cleared => "cleared",
        ServerFrame::Error { .. } => "error",
    }
}
