//! UseCase: イベントリレー
//!
//! 全ての接続から届くイベントを 1 つのタスクで順番に処理し、
//! プレゼンス・チャット・タイピングを fan-out します。
//!
//! | 受信イベント | 処理 | 配信先 |
//! |---|---|---|
//! | join | レジストリに登録 | 全員にプレゼンス |
//! | disconnect | 購読解除・登録解除 | 登録があった場合のみ全員にプレゼンス |
//! | chat | サーバー時刻を付与 | 送信者を含む全員 |
//! | typing | - | 送信者以外の全員 |
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Relay の各イベント処理と fan-out ポリシー
//! - RelayHandle 経由のコマンド処理（スナップショット取得、Subscription の drop）
//!
//! ### なぜこのテストが必要か
//! - プレゼンスは常に「接続中かつ join 済み」の集合と一致しなければならない
//! - チャットは送信者自身にも届き（配信確認を兼ねる）、タイピングは送信者に戻ってはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：join → chat → typing → disconnect の一連の流れ
//! - 異常系：空のユーザー名での join、join 前の切断、重複した切断
//! - エッジケース：時計が巻き戻った場合のタイムスタンプ

use std::sync::Arc;

use hubbub_shared::time::{Clock, timestamp_to_rfc3339};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{
    ChatMessage, ConnectionId, Fanout, MessagePusher, OutboundEvent, PresenceRepository,
    PusherChannel, Timestamp, TypingSignal, TypingState, Username,
};

use super::command::{RelayCommand, RelayHandle};

/// Event relay: the single owner of the presence registry and the pusher.
pub struct Relay {
    /// Repository（プレゼンスレジストリの抽象化）
    repository: Box<dyn PresenceRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Box<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// Last timestamp handed out to a chat message
    last_timestamp: Option<Timestamp>,
}

impl Relay {
    /// 新しい Relay を作成
    pub fn new(
        repository: Box<dyn PresenceRepository>,
        message_pusher: Box<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            last_timestamp: None,
        }
    }

    /// Spawn the relay onto the Tokio runtime.
    ///
    /// The task stops once every [`RelayHandle`] (and every subscription) is dropped.
    pub fn spawn(self) -> (RelayHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (RelayHandle::new(tx), task)
    }

    /// Process commands in arrival order until the queue closes.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<RelayCommand>) {
        tracing::info!("Relay started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::info!("Relay stopped");
    }

    /// Apply a single command. Never suspends.
    pub fn handle(&mut self, command: RelayCommand) {
        match command {
            RelayCommand::Connect {
                connection_id,
                channel,
            } => self.connect(connection_id, channel),
            RelayCommand::Join {
                connection_id,
                username,
            } => {
                self.join(&connection_id, username);
            }
            RelayCommand::Chat {
                connection_id,
                username,
                text,
            } => {
                self.chat(&connection_id, username, text);
            }
            RelayCommand::Typing {
                connection_id,
                username,
                state,
            } => self.typing(&connection_id, username, state),
            RelayCommand::Disconnect { connection_id } => {
                self.disconnect(&connection_id);
            }
            RelayCommand::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    tracing::debug!("Snapshot requester went away before the reply");
                }
            }
        }
    }

    /// 接続の送信チャンネルを購読者として登録
    pub fn connect(&mut self, connection_id: ConnectionId, channel: PusherChannel) {
        tracing::info!("Connection '{}' opened", connection_id);
        self.message_pusher.subscribe(connection_id, channel);
    }

    /// ユーザー名を登録し、全員にプレゼンスを配信
    ///
    /// 空（空白のみを含む）のユーザー名は黙って無視する。
    ///
    /// # Returns
    ///
    /// プレゼンスを配信した場合は `true`
    pub fn join(&mut self, connection_id: &ConnectionId, username: String) -> bool {
        let username = match Username::new(username) {
            Ok(username) => username,
            Err(e) => {
                tracing::debug!("Ignoring join from '{}': {}", connection_id, e);
                return false;
            }
        };

        tracing::info!("{} ({}) joined the chat", username, connection_id);
        self.repository.register(connection_id.clone(), username);
        self.broadcast_presence();
        true
    }

    /// 接続を購読解除・登録解除し、登録があった場合のみプレゼンスを配信
    ///
    /// # Returns
    ///
    /// プレゼンスを配信した場合は `true`
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> bool {
        // 切断した接続自身には配信しない
        self.message_pusher.unsubscribe(connection_id);

        match self.repository.unregister(connection_id) {
            Some(username) => {
                tracing::info!("{} ({}) disconnected", username, connection_id);
                self.broadcast_presence();
                true
            }
            None => {
                tracing::info!(
                    "Connection '{}' disconnected (no username was set)",
                    connection_id
                );
                false
            }
        }
    }

    /// サーバー時刻を付与したチャットメッセージを送信者を含む全員に配信
    pub fn chat(
        &mut self,
        connection_id: &ConnectionId,
        username: String,
        text: String,
    ) -> ChatMessage {
        let timestamp = self.next_timestamp();
        let message = ChatMessage::new(username, text, timestamp);

        tracing::info!(
            "Message from {} ({}) at {}: {}",
            message.username,
            connection_id,
            timestamp_to_rfc3339(timestamp.value()),
            message.text
        );
        self.push(&Fanout::All, &OutboundEvent::Chat(message.clone()));

        message
    }

    /// タイピング状態を送信者以外の全員に配信
    pub fn typing(&mut self, connection_id: &ConnectionId, username: String, state: TypingState) {
        tracing::debug!("{} ({}) typing: {:?}", username, connection_id, state);
        let signal = TypingSignal::new(username, state);
        self.push(
            &Fanout::AllExcept(connection_id.clone()),
            &OutboundEvent::Typing(signal),
        );
    }

    /// 現在のユーザー名一覧（登録順）
    pub fn snapshot(&self) -> Vec<Username> {
        self.repository.snapshot()
    }

    fn broadcast_presence(&self) {
        let snapshot = self.repository.snapshot();
        tracing::debug!(
            "Broadcasting presence of {} user(s) to {} connection(s)",
            snapshot.len(),
            self.message_pusher.subscriber_count()
        );
        self.push(&Fanout::All, &OutboundEvent::Presence(snapshot));
    }

    fn push(&self, fanout: &Fanout, event: &OutboundEvent) {
        if let Err(e) = self.message_pusher.broadcast(fanout, event) {
            tracing::warn!("Failed to broadcast event: {}", e);
        }
    }

    /// Server timestamps never go backwards, even if the wall clock does.
    fn next_timestamp(&mut self) -> Timestamp {
        let now = Timestamp::new(self.clock.now_millis());
        let timestamp = match self.last_timestamp {
            Some(last) => last.max(now),
            None => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }
}
