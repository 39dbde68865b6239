//! CRMS Client - booking client for the hosted campus data service
//!
//! Talks to the hosted backend through a generic table client and
//! implements the user-side workflows on top of it:
//!
//! - [`catalog`]: available rooms/equipment, search filter, selection
//! - [`form`]: reservation request validation and submission
//! - [`my_reservations`]: the signed-in user's reservations, cancellation
//! - [`dashboard`]: home and admin overview panels
//!
//! Availability, conflict detection and authorization are enforced by the
//! backend, not here.

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod my_reservations;
pub mod notify;

pub use auth::{AuthClient, Session};
pub use backend::{MemoryTableClient, RestTableClient, TableClient};
pub use catalog::{Catalog, CatalogLoader, CatalogView, FilteredCatalog};
pub use config::ClientConfig;
pub use dashboard::{AdminOverview, Dashboard, HomeOverview};
pub use error::{BookingError, BookingResult, ClientError, ClientResult, ValidationError};
pub use form::{ReservationForm, SubmitContext};
pub use my_reservations::{MyReservations, ReservationEntry, StatusBadge};
pub use notify::{Notifier, RecordingNotifier};

// Re-export shared types for convenience
pub use shared::{
    Equipment, Notification, Profile, Reservation, ReservationStatus, Resource, ResourceKind,
    ResourceRef, Room, TimeSlot,
};
