//! Repository trait 定義
//!
//! 接続 ID とユーザー名の対応（プレゼンス）を保持するレジストリのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! レジストリはリレーのイベント処理コンテキストが単独で所有するため、
//! メソッドは同期的で内部ロックを持ちません。

use super::{ConnectionId, Username};

/// Presence Repository trait
///
/// UseCase 層（`Relay`）はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
pub trait PresenceRepository: Send {
    /// 接続にユーザー名を登録する
    ///
    /// 既に登録済みの接続であればユーザー名を上書きする（登録順の位置は変わらない）。
    fn register(&mut self, connection_id: ConnectionId, username: Username);

    /// 接続の登録を解除する
    ///
    /// 登録されていた場合は削除したユーザー名を返し、未登録なら `None` を返す。
    fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Username>;

    /// 現在のユーザー名一覧を登録順で取得する
    fn snapshot(&self) -> Vec<Username>;

    /// 登録済みの接続数を取得する
    fn count(&self) -> usize;
}
