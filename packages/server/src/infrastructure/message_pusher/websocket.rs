//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket 接続ごとの `UnboundedSender` を管理
//! - イベントを JSON にエンコードし、fan-out ポリシーに従って配信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui::handler::websocket`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信チャンネルは無制限キューなので、遅い接続がリレーをブロックすることはありません。

use std::collections::HashMap;

use crate::{
    domain::{ConnectionId, Fanout, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let mut pusher = WebSocketMessagePusher::new();
/// pusher.subscribe(connection_id, tx);
///
/// // 全ての接続に配信
/// pusher.broadcast(&Fanout::All, &OutboundEvent::Presence(snapshot))?;
/// ```
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: HashMap<ConnectionId, PusherChannel>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn subscribe(&mut self, connection_id: ConnectionId, channel: PusherChannel) {
        tracing::debug!("Connection '{}' subscribed to MessagePusher", connection_id);
        self.clients.insert(connection_id, channel);
    }

    fn unsubscribe(&mut self, connection_id: &ConnectionId) -> bool {
        let removed = self.clients.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unsubscribed from MessagePusher",
                connection_id
            );
        }
        removed
    }

    fn broadcast(
        &self,
        fanout: &Fanout,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let content = Self::encode(event)?;

        let mut delivered = 0;
        for (connection_id, sender) in self
            .clients
            .iter()
            .filter(|(connection_id, _)| fanout.includes(connection_id))
        {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
            } else {
                delivered += 1;
            }
        }

        tracing::debug!("Broadcasted {} to {} connection(s)", content, delivered);
        Ok(delivered)
    }

    fn subscriber_count(&self) -> usize {
        self.clients.len()
    }
}
