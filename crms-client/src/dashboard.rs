//! Overview panels
//!
//! The home overview shows live counts of bookable rooms and equipment next
//! to static quick-access entries. The admin overview is gated on the admin
//! role and adds reservation counts and a feed of recent requests.

use std::sync::Arc;

use shared::{Notification, Reservation, ReservationStatus, TableQuery};

use crate::auth::Session;
use crate::backend::{self, TableClient};
use crate::catalog::{equipment_query, rooms_query};
use crate::error::{ClientError, ClientResult};
use crate::my_reservations::{date_line, time_line};
use crate::notify::Notifier;

/// Number of requests in the admin activity feed
pub const ACTIVITY_FEED_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatVariant {
    Default,
    Success,
    Warning,
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChange {
    pub value: String,
    pub trend: Trend,
}

impl StatChange {
    /// Change text with its trend sign
    pub fn text(&self) -> String {
        match self.trend {
            Trend::Up => format!("+{}", self.value),
            Trend::Down => format!("-{}", self.value),
            Trend::Neutral => self.value.clone(),
        }
    }
}

/// One statistic tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub variant: StatVariant,
    pub change: Option<StatChange>,
}

impl StatCard {
    fn new(title: &str, value: impl ToString, variant: StatVariant) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            variant,
            change: None,
        }
    }

    fn with_change(mut self, value: impl Into<String>, trend: Trend) -> Self {
        self.change = Some(StatChange {
            value: value.into(),
            trend,
        });
        self
    }
}

/// Shortcut into the booking screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAccess {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

pub const QUICK_ACCESS: [QuickAccess; 3] = [
    QuickAccess {
        title: "Book a Room",
        description: "Reserve classrooms, labs, conference rooms, and auditoriums for your classes and meetings.",
        action: "Browse Rooms",
    },
    QuickAccess {
        title: "Request Equipment",
        description: "Access audio-visual equipment, laptops, projectors, and specialized lab tools.",
        action: "View Equipment",
    },
    QuickAccess {
        title: "View Schedule",
        description: "Check your bookings, upcoming reservations, and coordinate with colleagues.",
        action: "Open Calendar",
    },
];

/// Home screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeOverview {
    pub stats: Vec<StatCard>,
    pub quick_access: &'static [QuickAccess],
}

/// One line of the admin activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub title: String,
    pub detail: String,
    pub when: String,
}

impl ActivityItem {
    fn from_reservation(reservation: &Reservation) -> Self {
        let title = match reservation.status {
            ReservationStatus::Pending => "Booking awaiting approval",
            ReservationStatus::Confirmed => "Booking confirmed",
            ReservationStatus::Cancelled => "Booking cancelled",
            ReservationStatus::Unknown => "Booking updated",
        };
        Self {
            title: title.to_string(),
            detail: format!(
                "{} booking, {}",
                reservation.resource_type,
                time_line(reservation.start_time, reservation.end_time)
            ),
            when: date_line(reservation.start_time),
        }
    }
}

/// Admin screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOverview {
    pub greeting: String,
    pub stats: Vec<StatCard>,
    pub activity: Vec<ActivityItem>,
}

/// Builds overview panels from backend counts
pub struct Dashboard {
    backend: Arc<dyn TableClient>,
    notifier: Arc<dyn Notifier>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn TableClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    async fn count(&self, query: TableQuery) -> ClientResult<usize> {
        Ok(self.backend.select(&query.columns("id")).await?.len())
    }

    /// Home overview. A failed count shows as "-" and is only logged.
    pub async fn home(&self) -> HomeOverview {
        let (rooms, equipment) = tokio::join!(
            self.count(rooms_query()),
            self.count(equipment_query())
        );
        let shown = |result: ClientResult<usize>, what: &str| match result {
            Ok(n) => n.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count {what}");
                "-".to_string()
            }
        };

        HomeOverview {
            stats: vec![
                StatCard::new("Available Rooms", shown(rooms, "rooms"), StatVariant::Success),
                StatCard::new("Equipment Ready", shown(equipment, "equipment"), StatVariant::Default),
            ],
            quick_access: &QUICK_ACCESS,
        }
    }

    /// Admin overview; [`ClientError::Forbidden`] for anyone but admins
    pub async fn admin(&self, session: &Session) -> ClientResult<AdminOverview> {
        if !session.is_admin() {
            tracing::warn!(user_id = %session.user_id, "Admin overview denied");
            return Err(ClientError::Forbidden(
                "administrator role required".to_string(),
            ));
        }

        let reservations_query = TableQuery::all("reservations").order_by("start_time");
        let loaded = tokio::try_join!(
            self.count(TableQuery::all("rooms")),
            self.count(TableQuery::all("equipment")),
            backend::select_rows::<Reservation>(self.backend.as_ref(), &reservations_query),
        );
        let (rooms, equipment, reservations) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "Error loading admin overview");
                self.notifier
                    .notify(Notification::error("Error", "Failed to load the admin dashboard."));
                return Err(e);
            }
        };

        let with_status = |status: ReservationStatus| {
            reservations.iter().filter(|r| r.status == status).count()
        };
        let pending = with_status(ReservationStatus::Pending);
        let confirmed = with_status(ReservationStatus::Confirmed);

        let stats = vec![
            StatCard::new("Total Rooms", rooms, StatVariant::Default),
            StatCard::new("Equipment Items", equipment, StatVariant::Accent),
            StatCard::new("Active Bookings", confirmed, StatVariant::Success),
            StatCard::new("Pending Approvals", pending, StatVariant::Warning)
                .with_change(format!("{} total requests", reservations.len()), Trend::Neutral),
        ];

        // latest start times first
        let activity = reservations
            .iter()
            .rev()
            .take(ACTIVITY_FEED_LEN)
            .map(ActivityItem::from_reservation)
            .collect();

        Ok(AdminOverview {
            greeting: format!("Welcome back, {}", session.display_name()),
            stats,
            activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryTableClient, TableOp};
    use crate::notify::RecordingNotifier;
    use serde_json::json;
    use shared::Profile;
    use uuid::Uuid;

    fn backend() -> Arc<MemoryTableClient> {
        let backend = Arc::new(MemoryTableClient::new());
        backend.seed(
            "rooms",
            [
                json!({"id": Uuid::new_v4(), "name": "A", "location": "North", "is_available": true}),
                json!({"id": Uuid::new_v4(), "name": "B", "location": "South", "is_available": false}),
            ],
        );
        backend.seed(
            "equipment",
            [json!({"id": Uuid::new_v4(), "name": "Laptop", "type": "Computer", "is_available": true})],
        );
        let user = Uuid::new_v4();
        let rows = (0..7).map(|day| {
            json!({
                "id": Uuid::new_v4(),
                "user_id": user,
                "resource_type": "room",
                "resource_id": Uuid::new_v4(),
                "start_time": format!("2026-11-{:02}T09:00:00.000Z", day + 1),
                "end_time": format!("2026-11-{:02}T10:00:00.000Z", day + 1),
                "status": if day % 2 == 0 { "pending" } else { "confirmed" },
                "notes": null,
            })
        });
        backend.seed("reservations", rows);
        backend
    }

    fn admin_session() -> Session {
        Session::new(Uuid::new_v4(), "token").with_profile(Profile {
            id: Uuid::new_v4(),
            first_name: Some("Maria".into()),
            last_name: Some("Santos".into()),
            role: Some("admin".into()),
        })
    }

    #[test]
    fn test_change_text() {
        let card = StatCard::new("x", 1, StatVariant::Default).with_change("3 more", Trend::Up);
        assert_eq!(card.change.unwrap().text(), "+3 more");
        let change = StatChange { value: "2".into(), trend: Trend::Down };
        assert_eq!(change.text(), "-2");
    }

    #[tokio::test]
    async fn test_home_counts_available_only() {
        let dashboard = Dashboard::new(backend(), Arc::new(RecordingNotifier::new()));

        let home = dashboard.home().await;

        assert_eq!(home.stats[0].title, "Available Rooms");
        assert_eq!(home.stats[0].value, "1");
        assert_eq!(home.stats[1].value, "1");
        assert_eq!(home.quick_access.len(), 3);
    }

    #[tokio::test]
    async fn test_home_failed_count_shows_dash() {
        let backend = backend();
        backend.fail(TableOp::Select, "equipment");
        let dashboard = Dashboard::new(backend, Arc::new(RecordingNotifier::new()));

        let home = dashboard.home().await;

        assert_eq!(home.stats[0].value, "1");
        assert_eq!(home.stats[1].value, "-");
    }

    #[tokio::test]
    async fn test_admin_requires_role() {
        let backend = backend();
        let dashboard = Dashboard::new(backend.clone(), Arc::new(RecordingNotifier::new()));
        let session = Session::new(Uuid::new_v4(), "token");

        let err = dashboard.admin(&session).await.unwrap_err();

        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_overview() {
        let dashboard = Dashboard::new(backend(), Arc::new(RecordingNotifier::new()));

        let overview = dashboard.admin(&admin_session()).await.unwrap();

        assert_eq!(overview.greeting, "Welcome back, Maria Santos");
        let values: Vec<&str> = overview.stats.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["2", "1", "3", "4"]);
        assert_eq!(overview.activity.len(), ACTIVITY_FEED_LEN);
        assert_eq!(overview.activity[0].title, "Booking awaiting approval");
    }

    #[tokio::test]
    async fn test_admin_backend_failure_notifies() {
        let backend = backend();
        backend.fail(TableOp::Select, "reservations");
        let notifier = Arc::new(RecordingNotifier::new());
        let dashboard = Dashboard::new(backend, notifier.clone());

        assert!(dashboard.admin(&admin_session()).await.is_err());
        assert!(notifier.last().unwrap().is_error());
    }
}
