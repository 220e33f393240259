//! Server state shared by the handlers.

use crate::usecase::RelayHandle;

/// Shared application state
pub struct AppState {
    /// Handle to the relay task（イベント処理の唯一の所有者）
    pub relay: RelayHandle,
}
