//! UseCase error types.

use thiserror::Error;

/// Errors returned by [`super::RelayHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The relay task has stopped and no longer accepts commands
    #[error("relay is no longer running")]
    Closed,
}
