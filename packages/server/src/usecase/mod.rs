//! UseCase layer: the event relay.
//!
//! `Relay` owns the presence registry and the message pusher and applies the
//! fan-out rules. It runs as a single task; connections talk to it through a
//! cloneable [`RelayHandle`].

pub mod command;
pub mod error;
pub mod relay;

pub use command::{RelayCommand, RelayHandle, Subscription};
pub use error::RelayError;
pub use relay::Relay;
