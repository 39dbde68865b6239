//! The signed-in user's reservations
//!
//! Lists every reservation the user owns, enriched with a short summary of
//! the referenced room or equipment, and cancels pending ones.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use shared::{Filter, Notification, Reservation, ReservationStatus, ResourceKind, TableQuery};
use uuid::Uuid;

use crate::auth::Session;
use crate::backend::{self, TableClient};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;

const RESERVATIONS_TABLE: &str = "reservations";

/// Badge colour for a reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Success,
    Warning,
    Destructive,
    Muted,
}

impl From<ReservationStatus> for StatusBadge {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Confirmed => Self::Success,
            ReservationStatus::Pending => Self::Warning,
            ReservationStatus::Cancelled => Self::Destructive,
            ReservationStatus::Unknown => Self::Muted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct RoomSummary {
    name: String,
    location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct EquipmentSummary {
    name: String,
    #[serde(rename = "type")]
    equipment_type: String,
}

/// Display fields of the resource a reservation points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSummary {
    Room { name: String, location: String },
    Equipment { name: String, equipment_type: String },
}

impl ResourceSummary {
    pub fn name(&self) -> &str {
        match self {
            Self::Room { name, .. } | Self::Equipment { name, .. } => name,
        }
    }

    /// Location for rooms, type for equipment
    pub fn detail(&self) -> &str {
        match self {
            Self::Room { location, .. } => location,
            Self::Equipment { equipment_type, .. } => equipment_type,
        }
    }
}

/// `"Saturday, October 17, 2026"` in the local time zone
pub fn date_line(instant: DateTime<Utc>) -> String {
    date_line_in(instant, &Local)
}

/// `"9:00 AM - 10:00 AM"` in the local time zone
pub fn time_line(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    time_line_in(start, end, &Local)
}

fn date_line_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%A, %B %-d, %Y").to_string()
}

fn time_line_in<Tz: TimeZone>(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{} - {}",
        start.with_timezone(tz).format("%-I:%M %p"),
        end.with_timezone(tz).format("%-I:%M %p")
    )
}

/// One listed reservation
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationEntry {
    pub reservation: Reservation,
    /// `None` when the resource lookup failed
    pub resource: Option<ResourceSummary>,
}

impl ReservationEntry {
    /// Whether the cancel action is offered
    pub fn can_cancel(&self) -> bool {
        self.reservation.status.is_cancellable()
    }

    pub fn resource_name(&self) -> Option<&str> {
        self.resource.as_ref().map(ResourceSummary::name)
    }

    pub fn resource_detail(&self) -> Option<&str> {
        self.resource.as_ref().map(ResourceSummary::detail)
    }

    pub fn status_badge(&self) -> StatusBadge {
        self.reservation.status.into()
    }

    pub fn date_line(&self) -> String {
        date_line(self.reservation.start_time)
    }

    pub fn time_line(&self) -> String {
        time_line(self.reservation.start_time, self.reservation.end_time)
    }
}

/// Query for one user's reservations, earliest first
pub fn user_reservations_query(user_id: Uuid) -> TableQuery {
    TableQuery::all(RESERVATIONS_TABLE)
        .eq("user_id", user_id)
        .order_by("start_time")
}

/// Look up the summary of a reservation's resource.
///
/// Failures are logged and yield `None`.
pub async fn lookup_resource(
    backend: &dyn TableClient,
    kind: ResourceKind,
    id: Uuid,
) -> Option<ResourceSummary> {
    let query = TableQuery::all(kind.table())
        .columns(kind.summary_columns())
        .eq("id", id);

    let result = match kind {
        ResourceKind::Room => backend::select_single::<RoomSummary>(backend, &query)
            .await
            .map(|r| ResourceSummary::Room {
                name: r.name,
                location: r.location,
            }),
        ResourceKind::Equipment => backend::select_single::<EquipmentSummary>(backend, &query)
            .await
            .map(|e| ResourceSummary::Equipment {
                name: e.name,
                equipment_type: e.equipment_type,
            }),
    };

    match result {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(kind = %kind, id = %id, error = %e, "Resource lookup failed");
            None
        }
    }
}

/// Reservation list state for the signed-in user
pub struct MyReservations {
    backend: Arc<dyn TableClient>,
    notifier: Arc<dyn Notifier>,
    entries: Vec<ReservationEntry>,
}

impl MyReservations {
    pub fn new(backend: Arc<dyn TableClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ReservationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reload the list. No-op without a session; on failure the previous
    /// list is kept.
    pub async fn load(&mut self, session: Option<&Session>) -> ClientResult<()> {
        let Some(session) = session else {
            return Ok(());
        };

        let query = user_reservations_query(session.user_id);
        let reservations =
            match backend::select_rows::<Reservation>(self.backend.as_ref(), &query).await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!(user_id = %session.user_id, error = %e, "Error fetching reservations");
                    self.notifier.notify(Notification::error(
                        "Error",
                        "Failed to load your reservations.",
                    ));
                    return Err(e);
                }
            };

        let backend = self.backend.as_ref();
        let summaries = join_all(
            reservations
                .iter()
                .map(|r| lookup_resource(backend, r.resource_type, r.resource_id)),
        )
        .await;

        self.entries = reservations
            .into_iter()
            .zip(summaries)
            .map(|(reservation, resource)| ReservationEntry {
                reservation,
                resource,
            })
            .collect();
        tracing::debug!(count = self.entries.len(), "Reservations loaded");
        Ok(())
    }

    /// Withdraw a reservation and reload the list.
    ///
    /// Callers only offer this for entries where
    /// [`ReservationEntry::can_cancel`] holds.
    pub async fn cancel(&mut self, session: Option<&Session>, id: Uuid) -> ClientResult<()> {
        let values = json!({ "status": ReservationStatus::Cancelled });
        let filters = [Filter::eq("id", id)];

        if let Err(e) = self
            .backend
            .update(RESERVATIONS_TABLE, values, &filters)
            .await
        {
            tracing::error!(reservation_id = %id, error = %e, "Error cancelling reservation");
            self.notifier.notify(Notification::error(
                "Error",
                "Failed to cancel reservation. Please try again.",
            ));
            return Err(e);
        }

        tracing::info!(reservation_id = %id, "Reservation cancelled");
        self.notifier.notify(Notification::info(
            "Reservation Cancelled",
            "Your reservation has been cancelled successfully.",
        ));
        // a failed reload reports itself; the cancellation already happened
        let _ = self.load(session).await;
        Ok(())
    }

    /// Entry by reservation id
    pub fn find(&self, id: Uuid) -> ClientResult<&ReservationEntry> {
        self.entries
            .iter()
            .find(|e| e.reservation.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("reservation {id}")))
    }
}
