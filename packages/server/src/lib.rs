//! Real-time chat relay library.
//!
//! This library provides the presence registry, the event relay and the
//! WebSocket/HTTP server of the Hubbub chat relay.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
