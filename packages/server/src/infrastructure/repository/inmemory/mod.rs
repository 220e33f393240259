//! In-memory repository implementations.

pub mod presence;

pub use presence::InMemoryPresenceRepository;
