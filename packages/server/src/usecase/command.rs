//! Commands accepted by the relay, and the handles used to send them.

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, PusherChannel, TypingState, Username};

use super::error::RelayError;

/// Inbound events, processed one at a time by [`super::Relay`].
#[derive(Debug)]
pub enum RelayCommand {
    /// Transport handshake completed; start delivering events to `channel`
    Connect {
        connection_id: ConnectionId,
        channel: PusherChannel,
    },
    /// Announce a username (raw; validated by the relay)
    Join {
        connection_id: ConnectionId,
        username: String,
    },
    Chat {
        connection_id: ConnectionId,
        username: String,
        text: String,
    },
    Typing {
        connection_id: ConnectionId,
        username: String,
        state: TypingState,
    },
    /// Transport closed
    Disconnect { connection_id: ConnectionId },
    /// Read the current presence snapshot
    Snapshot { reply: oneshot::Sender<Vec<Username>> },
}

/// Cloneable sender side of the relay's command queue.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    commands: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayHandle {
    pub fn new(commands: mpsc::UnboundedSender<RelayCommand>) -> Self {
        Self { commands }
    }

    /// Enqueue a command for the relay
    pub fn send(&self, command: RelayCommand) -> Result<(), RelayError> {
        self.commands.send(command).map_err(|_| RelayError::Closed)
    }

    /// Subscribe a new connection.
    ///
    /// The returned [`Subscription`] disconnects the connection when dropped.
    pub fn subscribe(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<Subscription, RelayError> {
        self.send(RelayCommand::Connect {
            connection_id: connection_id.clone(),
            channel,
        })?;
        Ok(Subscription {
            connection_id,
            relay: self.clone(),
        })
    }

    /// Fetch the current presence snapshot from the relay
    pub async fn snapshot(&self) -> Result<Vec<Username>, RelayError> {
        let (reply, response) = oneshot::channel();
        self.send(RelayCommand::Snapshot { reply })?;
        response.await.map_err(|_| RelayError::Closed)
    }
}

/// Scoped subscription of one connection to the relay.
///
/// Every inbound event is tagged with this subscription's connection id.
/// Dropping it enqueues a [`RelayCommand::Disconnect`], so a connection is
/// always unsubscribed however its handler exits.
#[derive(Debug)]
pub struct Subscription {
    connection_id: ConnectionId,
    relay: RelayHandle,
}

impl Subscription {
    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn join(&self, username: String) -> Result<(), RelayError> {
        self.relay.send(RelayCommand::Join {
            connection_id: self.connection_id.clone(),
            username,
        })
    }

    pub fn chat(&self, username: String, text: String) -> Result<(), RelayError> {
        self.relay.send(RelayCommand::Chat {
            connection_id: self.connection_id.clone(),
            username,
            text,
        })
    }

    pub fn typing(&self, username: String, state: TypingState) -> Result<(), RelayError> {
        self.relay.send(RelayCommand::Typing {
            connection_id: self.connection_id.clone(),
            username,
            state,
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let command = RelayCommand::Disconnect {
            connection_id: self.connection_id.clone(),
        };
        if self.relay.send(command).is_err() {
            tracing::debug!(
                "Relay already stopped; dropping disconnect for '{}'",
                self.connection_id
            );
        }
    }
}
