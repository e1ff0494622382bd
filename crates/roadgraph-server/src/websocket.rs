//! WebSocket feed of graph changes

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use roadgraph_core::{EdgeList, GraphChange};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::ServerState;

/// WebSocket message types for client-server communication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    /// Client asks for the whole graph again
    #[serde(rename = "request_full_graph")]
    RequestFullGraph,
    /// Server sends the whole graph
    #[serde(rename = "full_graph")]
    FullGraph { graph: EdgeList, version: u64 },
    /// Server announces one applied mutation
    #[serde(rename = "graph_change")]
    Change { change: GraphChange },
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "error")]
    Error { message: String },
}

/// Serialize a change the way it goes out on the feed.
pub fn change_message(change: &GraphChange) -> serde_json::Result<String> {
    serde_json::to_string(&WsMessage::Change {
        change: change.clone(),
    })
}

fn full_graph_message(state: &ServerState) -> serde_json::Result<String> {
    let snapshot = state.store.snapshot();
    serde_json::to_string(&WsMessage::FullGraph {
        graph: snapshot.to_edge_list(),
        version: snapshot.version(),
    })
}

/// Handle WebSocket upgrade requests
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    info!("New WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    // subscribe before the snapshot so no change slips between the two
    let mut rx = state.feed.subscribe();

    match full_graph_message(&state) {
        Ok(msg) => {
            if sender.send(Message::Text(msg)).await.is_err() {
                warn!("Failed to send initial full graph to WebSocket client");
                return;
            }
        }
        Err(e) => warn!("Failed to serialize full graph message: {}", e),
    }

    // Replies to client requests go through the send task
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<String>();

    let state_clone = Arc::clone(&state);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!("Received WebSocket message: {}", text);
                    let reply = match serde_json::from_str::<WsMessage>(&text) {
                        Ok(ws_msg) => handle_client_message(ws_msg, &state_clone),
                        Err(e) => {
                            warn!("Failed to parse WebSocket message: {}", e);
                            serde_json::to_string(&WsMessage::Error {
                                message: format!("unrecognised message: {e}"),
                            })
                            .ok()
                        }
                    };
                    if let Some(reply) = reply {
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => {
                    debug!("WebSocket client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    let feed_state = Arc::clone(&state);
    let mut send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                change = rx.recv() => match feed_step(change, &feed_state) {
                    FeedStep::Send(msg) => msg,
                    FeedStep::Skip => continue,
                    FeedStep::Close => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(msg) => msg,
                    None => break,
                },
            };
            if sender.send(Message::Text(outgoing)).await.is_err() {
                debug!("Failed to send message to WebSocket client");
                break;
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    info!("WebSocket connection closed");
}

enum FeedStep {
    Send(String),
    Skip,
    Close,
}

/// Decide what a feed receive means for the socket.
///
/// A lagged client has missed changes, so it gets the whole graph again.
/// Changes still queued behind it carry versions at or below the resent
/// `full_graph` version and are ignored by clients.
fn feed_step(received: Result<String, broadcast::error::RecvError>, state: &ServerState) -> FeedStep {
    match received {
        Ok(msg) => FeedStep::Send(msg),
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            warn!(skipped, "WebSocket client lagged behind, resending full graph");
            match full_graph_message(state) {
                Ok(msg) => FeedStep::Send(msg),
                Err(e) => {
                    warn!("Failed to serialize full graph message: {}", e);
                    FeedStep::Skip
                }
            }
        }
        Err(broadcast::error::RecvError::Closed) => FeedStep::Close,
    }
}

/// Answer a client message; `None` when no reply is due.
fn handle_client_message(msg: WsMessage, state: &ServerState) -> Option<String> {
    match msg {
        WsMessage::RequestFullGraph => {
            debug!("Client requested full graph");
            full_graph_message(state).ok()
        }
        WsMessage::Ping => serde_json::to_string(&WsMessage::Pong).ok(),
        other => {
            debug!("Ignoring client message: {:?}", other);
            None
        }
    }
}
