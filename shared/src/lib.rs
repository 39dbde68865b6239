//! Shared types for the campus resource management client
//!
//! Data model, booking time slots, table query descriptions and
//! notification payloads. Used by `crms-client` and `crms-cli`; no I/O here.

pub mod models;
pub mod notification;
pub mod query;
pub mod slot;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Equipment, NewReservation, Profile, Reservation, ReservationStatus, Resource, ResourceKind,
    ResourceRef, Room,
};
pub use notification::{Notification, NotificationVariant};
pub use query::{Filter, TableQuery};
pub use slot::{SlotError, TimeSlot};
