//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame shaped as `{"type": <event>, "payload": <data>}`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Announce the username of this connection
    Join(String),
    Chat(ChatPayload),
    TypingStart(String),
    TypingStop(String),
}

/// Payload of an inbound chat event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    Presence(Vec<String>),
    Chat(ChatBroadcast),
    Typing(TypingBroadcast),
}

/// Payload of an outbound chat event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBroadcast {
    pub username: String,
    pub text: String,
    /// Server-assigned Unix timestamp (milliseconds)
    pub timestamp: i64,
}

/// Payload of an outbound typing event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingBroadcast {
    pub username: String,
    pub state: TypingStateDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingStateDto {
    Started,
    Stopped,
}
