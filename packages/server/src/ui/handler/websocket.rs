//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionIdFactory, TypingState},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::{RelayError, Subscription},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events fanned out by the relay
/// (via rx channel) are sent to this client's WebSocket connection. The task ends
/// when the relay drops the channel or the socket stops accepting frames.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Forward a parsed client event to the relay
fn dispatch(subscription: &Subscription, event: ClientEvent) -> Result<(), RelayError> {
    match event {
        ClientEvent::Join(username) => subscription.join(username),
        ClientEvent::Chat(payload) => subscription.chat(payload.username, payload.text),
        ClientEvent::TypingStart(username) => subscription.typing(username, TypingState::Started),
        ClientEvent::TypingStop(username) => subscription.typing(username, TypingState::Stopped),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this client to receive relayed events
    let (tx, rx) = mpsc::unbounded_channel();

    let subscription = match state.relay.subscribe(connection_id.clone(), tx) {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::error!("Cannot accept connection '{}': {}", connection_id, e);
            return;
        }
    };
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, mut receiver) = socket.split();

    // Spawn a task to receive messages from this client.
    // The subscription lives in this task: when it finishes or is aborted,
    // the subscription is dropped and the relay is told about the disconnect.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(
                        "WebSocket error on '{}': {}",
                        subscription.connection_id(),
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text.as_str());

                    let event = match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Ignoring malformed event: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = dispatch(&subscription, event) {
                        tracing::error!("Failed to forward event to relay: {}", e);
                        break;
                    }
                }
                Message::Binary(data) => {
                    tracing::warn!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Client '{}' requested close",
                        subscription.connection_id()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push relayed events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    tracing::info!("Client '{}' disconnected", connection_id);
}
