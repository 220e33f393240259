//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Current presence snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDto {
    /// Usernames in registration order
    pub users: Vec<String>,
    pub count: usize,
}
