//! Factory for server-assigned identifiers.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Generates a fresh [`ConnectionId`] for every accepted WebSocket upgrade.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 を使って新しい接続 ID を生成
    pub fn generate() -> ConnectionId {
        // UUID の文字列表現は空にならない
        ConnectionId(Uuid::new_v4().to_string())
    }
}
