//! Domain error types.

use thiserror::Error;

/// Value object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Username is empty or whitespace only
    #[error("username must not be empty")]
    EmptyUsername,

    /// ConnectionId is empty
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// メッセージ送信（push）のエラー
///
/// 個々の受信者への送信失敗はエラーにしない（ログに残してスキップする）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The outbound event could not be encoded for the wire
    #[error("failed to serialize outbound event: {0}")]
    Serialization(String),
}
