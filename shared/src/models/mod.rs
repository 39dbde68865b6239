//! Data models
//!
//! Row types for the `rooms`, `equipment`, `reservations` and `profiles`
//! tables. All IDs are UUIDs assigned by the backend.

pub mod equipment;
pub mod profile;
pub mod reservation;
pub mod resource;
pub mod room;

// Re-exports
pub use equipment::*;
pub use profile::*;
pub use reservation::*;
pub use resource::*;
pub use room::*;
