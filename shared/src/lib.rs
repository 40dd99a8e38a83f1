//! Shared types for the café ordering platform
//!
//! Common types used by the server and its clients: event-channel message
//! structures and the API DTOs both sides serialize.

pub mod dto;
pub mod message;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Event channel re-exports (for convenient access)
pub use message::{BusMessage, EventTarget, EventType};
