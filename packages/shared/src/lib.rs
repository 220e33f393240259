//! Utilities shared by the Hubbub packages: logging setup and time handling.

pub mod logger;
pub mod time;
