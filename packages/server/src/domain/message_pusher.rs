//! MessagePusher trait 定義
//!
//! 接続ごとの送信チャンネル（購読）を管理し、イベントを配信するインターフェース。
//!
//! ## 設計ノート
//!
//! 送信チャンネルの生成は UI 層（WebSocket ハンドラ）で行い、
//! 購読の登録・解除と配信はリレー経由でこの trait に委譲されます。

use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// Outbound channel of one connection (already-encoded text frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Which subscribers receive a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fanout {
    /// Every subscribed connection, including the originator
    All,
    /// Every subscribed connection except the given one
    AllExcept(ConnectionId),
}

impl Fanout {
    /// Whether the given connection is a target of this fan-out.
    pub fn includes(&self, connection_id: &ConnectionId) -> bool {
        match self {
            Fanout::All => true,
            Fanout::AllExcept(excluded) => excluded != connection_id,
        }
    }
}

/// MessagePusher trait
///
/// ブロードキャストはベストエフォート：一部の受信者への送信失敗は
/// 他の受信者への配信を妨げない。
#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send {
    /// 接続の送信チャンネルを購読者として登録する
    fn subscribe(&mut self, connection_id: ConnectionId, channel: PusherChannel);

    /// 購読を解除する。登録されていた場合は `true` を返す
    fn unsubscribe(&mut self, connection_id: &ConnectionId) -> bool;

    /// イベントを fan-out ポリシーに従って配信し、配信できた接続数を返す
    fn broadcast(
        &self,
        fanout: &Fanout,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;

    /// 購読中の接続数
    fn subscriber_count(&self) -> usize;
}
