//! Conversion logic between domain entities and DTOs.

use crate::domain::entity;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::TypingState> for dto::TypingStateDto {
    fn from(state: entity::TypingState) -> Self {
        match state {
            entity::TypingState::Started => Self::Started,
            entity::TypingState::Stopped => Self::Stopped,
        }
    }
}

impl From<&entity::ChatMessage> for dto::ChatBroadcast {
    fn from(model: &entity::ChatMessage) -> Self {
        Self {
            username: model.username.clone(),
            text: model.text.clone(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<&entity::TypingSignal> for dto::TypingBroadcast {
    fn from(model: &entity::TypingSignal) -> Self {
        Self {
            username: model.username.clone(),
            state: model.state.into(),
        }
    }
}

impl From<&entity::OutboundEvent> for dto::ServerEvent {
    fn from(event: &entity::OutboundEvent) -> Self {
        match event {
            entity::OutboundEvent::Presence(users) => {
                Self::Presence(users.iter().map(|u| u.as_str().to_string()).collect())
            }
            entity::OutboundEvent::Chat(message) => Self::Chat(message.into()),
            entity::OutboundEvent::Typing(signal) => Self::Typing(signal.into()),
        }
    }
}
