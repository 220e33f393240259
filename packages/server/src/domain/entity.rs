//! Domain entities and the events the relay emits.

use super::value_object::{ConnectionId, Timestamp, Username};

/// Presence entry: which user occupies which connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub connection_id: ConnectionId,
    pub username: Username,
}

impl PresenceEntry {
    pub fn new(connection_id: ConnectionId, username: Username) -> Self {
        Self {
            connection_id,
            username,
        }
    }
}

/// A chat message as relayed to participants.
///
/// `username` and `text` are forwarded exactly as the client sent them; only
/// the timestamp is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: String,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(username: String, text: String, timestamp: Timestamp) -> Self {
        Self {
            username,
            text,
            timestamp,
        }
    }
}

/// Typing state carried by a [`TypingSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    Started,
    Stopped,
}

/// Transient typing notification. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    pub username: String,
    pub state: TypingState,
}

impl TypingSignal {
    pub fn new(username: String, state: TypingState) -> Self {
        Self { username, state }
    }
}

/// Events pushed from the relay to connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Full presence snapshot, in registration order
    Presence(Vec<Username>),
    Chat(ChatMessage),
    Typing(TypingSignal),
}
