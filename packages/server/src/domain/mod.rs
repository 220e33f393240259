//! Domain layer for the chat relay.
//!
//! This module contains the presence model, the relay events and the
//! interfaces (registry and pusher) that the usecase layer depends on.
//! Concrete implementations live in the infrastructure layer.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, OutboundEvent, PresenceEntry, TypingSignal, TypingState};
pub use error::{MessagePushError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{Fanout, MessagePusher, PusherChannel};
pub use repository::PresenceRepository;
pub use value_object::{ConnectionId, Timestamp, Username};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
