//! Reservation Model
//!
//! Lifecycle: a reservation is created `pending`, may be cancelled by its
//! owner while still `pending`, and is confirmed (or otherwise settled) by
//! an administrator outside this client.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ResourceKind, ResourceRef};
use crate::util::iso_millis;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    /// Any status this client does not know (set by the admin side)
    #[serde(other)]
    Unknown,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Only pending requests may be withdrawn by their owner
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation row (`reservations` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resource_type: ResourceKind,
    pub resource_id: Uuid,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

/// Insert payload for a new reservation request.
///
/// Only constructible through [`NewReservation::pending`], so every
/// request leaves this client with status `pending`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub resource_type: ResourceKind,
    pub resource_id: Uuid,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    status: ReservationStatus,
}

impl NewReservation {
    /// Build a pending request. Notes are trimmed; blank notes are omitted.
    pub fn pending(
        user_id: Uuid,
        resource: &ResourceRef,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: &str,
    ) -> Self {
        let notes = notes.trim();
        Self {
            user_id,
            resource_type: resource.kind,
            resource_id: resource.id,
            start_time,
            end_time,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            status: ReservationStatus::Pending,
        }
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }
}
