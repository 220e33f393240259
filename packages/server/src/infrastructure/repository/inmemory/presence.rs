//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! 登録順を保つため `Vec` をインメモリストアとして使用します。
//!
//! 接続数は 1 プロセス内のチャット参加者数に限られるため、線形探索で十分です。

use crate::domain::{ConnectionId, PresenceEntry, PresenceRepository, Username};

/// インメモリ Presence Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryPresenceRepository {
    /// 登録順に並んだプレゼンスエントリ
    entries: Vec<PresenceEntry>,
}

impl InMemoryPresenceRepository {
    /// 新しい InMemoryPresenceRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.connection_id == connection_id)
    }
}

impl PresenceRepository for InMemoryPresenceRepository {
    fn register(&mut self, connection_id: ConnectionId, username: Username) {
        match self.position(&connection_id) {
            Some(index) => {
                tracing::debug!(
                    "Connection '{}' re-announced as '{}' (was '{}')",
                    connection_id,
                    username,
                    self.entries[index].username
                );
                self.entries[index].username = username;
            }
            None => self
                .entries
                .push(PresenceEntry::new(connection_id, username)),
        }
    }

    fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Username> {
        let index = self.position(connection_id)?;
        Some(self.entries.remove(index).username)
    }

    fn snapshot(&self) -> Vec<Username> {
        self.entries
            .iter()
            .map(|entry| entry.username.clone())
            .collect()
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}
