//! Reservation form
//!
//! Collects date, start/end slot and notes for one resource, validates
//! locally and submits a single `pending` reservation. Nothing reaches the
//! backend unless every rule passes:
//!
//! 1. signed in, and date, start and end chosen
//! 2. start slot strictly before end slot (`"HH:MM"` compared as strings)
//! 3. date not before [`MIN_BOOKING_DATE`] and strictly after today (a day
//!    whose midnight has already passed is not bookable)

use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone, Utc};
use shared::{NewReservation, Notification, ResourceRef, TimeSlot};

use crate::auth::Session;
use crate::backend::TableClient;
use crate::error::{BookingResult, ClientError, ValidationError};
use crate::notify::Notifier;

/// Earliest calendar date the form accepts
pub const MIN_BOOKING_DATE: (i32, u32, u32) = (1900, 1, 1);

const RESERVATIONS_TABLE: &str = "reservations";

fn min_booking_date() -> NaiveDate {
    let (y, m, d) = MIN_BOOKING_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Date + slot as a local wall-clock instant (seconds and millis zero)
fn local_instant(date: NaiveDate, slot: TimeSlot) -> Result<DateTime<Utc>, ValidationError> {
    resolve_local(Local.from_local_datetime(&date.and_time(slot.to_naive_time())))
}

/// Earliest mapping of an ambiguous time; a DST gap has none
fn resolve_local<Tz: TimeZone>(
    mapped: LocalResult<DateTime<Tz>>,
) -> Result<DateTime<Utc>, ValidationError> {
    mapped
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ValidationError::NonexistentTime)
}

/// Collaborators a submission needs
pub struct SubmitContext<'a> {
    pub backend: &'a dyn TableClient,
    pub session: Option<&'a Session>,
    pub notifier: &'a dyn Notifier,
}

/// Form state for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationForm {
    resource: ResourceRef,
    date: Option<NaiveDate>,
    start: Option<TimeSlot>,
    end: Option<TimeSlot>,
    notes: String,
}

impl ReservationForm {
    pub fn new(resource: ResourceRef) -> Self {
        Self {
            resource,
            date: None,
            start: None,
            end: None,
            notes: String::new(),
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn title(&self) -> String {
        format!("Reserve {}", self.resource.name)
    }

    pub fn subtitle(&self) -> String {
        format!("Book this {} for your event or activity", self.resource.kind)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    pub fn start(&self) -> Option<TimeSlot> {
        self.start
    }

    pub fn set_start(&mut self, slot: Option<TimeSlot>) {
        self.start = slot;
    }

    pub fn end(&self) -> Option<TimeSlot> {
        self.end
    }

    pub fn set_end(&mut self, slot: Option<TimeSlot>) {
        self.end = slot;
    }

    /// Pick the start slot by value (`"09:00"`)
    pub fn select_start(&mut self, value: &str) -> Result<(), ValidationError> {
        self.start = Some(parse_slot(value)?);
        Ok(())
    }

    /// Pick the end slot by value (`"10:00"`)
    pub fn select_end(&mut self, value: &str) -> Result<(), ValidationError> {
        self.end = Some(parse_slot(value)?);
        Ok(())
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Check every rule and build the insert payload
    pub fn validate(
        &self,
        session: Option<&Session>,
        today: NaiveDate,
    ) -> Result<NewReservation, ValidationError> {
        let (Some(session), Some(date), Some(start), Some(end)) =
            (session, self.date, self.start, self.end)
        else {
            return Err(ValidationError::MissingInformation);
        };

        if start.value() >= end.value() {
            return Err(ValidationError::InvalidTimeRange);
        }
        if date < min_booking_date() {
            return Err(ValidationError::DateOutOfRange);
        }
        if date <= today {
            return Err(ValidationError::DateInPast);
        }

        let start_time = local_instant(date, start)?;
        let end_time = local_instant(date, end)?;

        Ok(NewReservation::pending(
            session.user_id,
            &self.resource,
            start_time,
            end_time,
            &self.notes,
        ))
    }

    /// Validate against today's local date and submit.
    ///
    /// On success notifies, then calls `on_success` followed by `on_close`.
    /// On any failure notifies and leaves the form untouched.
    pub async fn submit<S, C>(
        &mut self,
        ctx: &SubmitContext<'_>,
        on_success: S,
        on_close: C,
    ) -> BookingResult<NewReservation>
    where
        S: FnOnce(),
        C: FnOnce(),
    {
        let today = Local::now().date_naive();
        self.submit_on(ctx, today, on_success, on_close).await
    }

    /// [`Self::submit`] with an explicit "today"
    pub async fn submit_on<S, C>(
        &mut self,
        ctx: &SubmitContext<'_>,
        today: NaiveDate,
        on_success: S,
        on_close: C,
    ) -> BookingResult<NewReservation>
    where
        S: FnOnce(),
        C: FnOnce(),
    {
        let request = match self.validate(ctx.session, today) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(resource = %self.resource.name, error = %e, "Reservation rejected");
                ctx.notifier
                    .notify(Notification::error(e.title(), e.description()));
                return Err(e.into());
            }
        };

        let row = serde_json::to_value(&request).map_err(ClientError::from)?;
        match ctx.backend.insert(RESERVATIONS_TABLE, row).await {
            Ok(()) => {
                tracing::info!(
                    resource_id = %request.resource_id,
                    resource_type = %request.resource_type,
                    start = %request.start_time,
                    end = %request.end_time,
                    "Reservation created"
                );
                ctx.notifier.notify(Notification::info(
                    "Reservation Created",
                    format!(
                        "Your {} reservation has been submitted and is pending approval.",
                        self.resource.kind
                    ),
                ));
                on_success();
                on_close();
                Ok(request)
            }
            Err(e) => {
                tracing::error!(resource_id = %request.resource_id, error = %e, "Error creating reservation");
                ctx.notifier.notify(Notification::error(
                    "Error",
                    "Failed to create reservation. Please try again.",
                ));
                Err(e.into())
            }
        }
    }
}

fn parse_slot(value: &str) -> Result<TimeSlot, ValidationError> {
    TimeSlot::parse(value).map_err(|_| ValidationError::UnknownSlot(value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryTableClient, TableOp};
    use crate::error::BookingError;
    use crate::notify::RecordingNotifier;
    use shared::util::iso_millis;
    use shared::{ReservationStatus, ResourceKind};
    use std::cell::{Cell, RefCell};
    use uuid::Uuid;

    fn lab() -> ResourceRef {
        ResourceRef {
            id: Uuid::new_v4(),
            kind: ResourceKind::Room,
            name: "Lab A-102".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        today().succ_opt().unwrap()
    }

    fn filled_form(start: &str, end: &str) -> ReservationForm {
        let mut form = ReservationForm::new(lab());
        form.set_date(Some(tomorrow()));
        form.select_start(start).unwrap();
        form.select_end(end).unwrap();
        form
    }

    #[test]
    fn test_form_labels() {
        let form = ReservationForm::new(lab());
        assert_eq!(form.title(), "Reserve Lab A-102");
        assert_eq!(form.subtitle(), "Book this room for your event or activity");
    }

    #[test]
    fn test_missing_fields() {
        let session = Session::new(Uuid::new_v4(), "t");
        let mut form = ReservationForm::new(lab());
        assert_eq!(
            form.validate(Some(&session), today()),
            Err(ValidationError::MissingInformation)
        );

        form.set_date(Some(tomorrow()));
        form.select_start("09:00").unwrap();
        assert_eq!(
            form.validate(Some(&session), today()),
            Err(ValidationError::MissingInformation)
        );

        form.select_end("10:00").unwrap();
        assert_eq!(
            form.validate(None, today()),
            Err(ValidationError::MissingInformation)
        );
        assert!(form.validate(Some(&session), today()).is_ok());
    }

    #[test]
    fn test_slot_pairs_accepted_iff_start_before_end() {
        let session = Session::new(Uuid::new_v4(), "t");
        for start in TimeSlot::all() {
            for end in TimeSlot::all() {
                let form = filled_form(&start.value(), &end.value());
                let result = form.validate(Some(&session), today());
                if start.value() < end.value() {
                    assert!(result.is_ok(), "{start}-{end} should be accepted");
                } else {
                    assert_eq!(result, Err(ValidationError::InvalidTimeRange), "{start}-{end}");
                }
            }
        }
    }

    #[test]
    fn test_past_dates_rejected() {
        let session = Session::new(Uuid::new_v4(), "t");
        let mut form = filled_form("09:00", "10:00");

        form.set_date(today().pred_opt());
        assert_eq!(form.validate(Some(&session), today()), Err(ValidationError::DateInPast));

        form.set_date(NaiveDate::from_ymd_opt(1899, 12, 31));
        assert_eq!(
            form.validate(Some(&session), today()),
            Err(ValidationError::DateOutOfRange)
        );

        form.set_date(Some(today()));
        assert_eq!(form.validate(Some(&session), today()), Err(ValidationError::DateInPast));

        form.set_date(Some(tomorrow()));
        assert!(form.validate(Some(&session), today()).is_ok());
    }

    #[test]
    fn test_slot_earlier_today_rejected() {
        let session = Session::new(Uuid::new_v4(), "t");
        let now = Local::now().date_naive();
        let mut form = filled_form("08:00", "09:00");
        form.set_date(Some(now));

        assert_eq!(form.validate(Some(&session), now), Err(ValidationError::DateInPast));
    }

    #[test]
    fn test_daylight_saving_gap() {
        let gap: LocalResult<DateTime<Utc>> = LocalResult::None;
        let err = resolve_local(gap).unwrap_err();
        assert_eq!(err, ValidationError::NonexistentTime);
        assert_eq!(err.title(), "Invalid Time");
        assert_eq!(err.description(), "That time does not exist on the chosen date.");

        let first = Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap();
        assert_eq!(resolve_local(LocalResult::Ambiguous(first, second)), Ok(first));
    }

    #[test]
    fn test_unknown_slot_value() {
        let mut form = ReservationForm::new(lab());
        assert_eq!(
            form.select_start("07:00"),
            Err(ValidationError::UnknownSlot("07:00".into()))
        );
        assert!(form.start().is_none());
    }

    #[tokio::test]
    async fn test_submit_creates_pending_reservation() {
        let backend = MemoryTableClient::new();
        let notifier = RecordingNotifier::new();
        let session = Session::new(Uuid::new_v4(), "t");
        let ctx = SubmitContext {
            backend: &backend,
            session: Some(&session),
            notifier: &notifier,
        };

        let order = RefCell::new(Vec::new());
        let mut form = filled_form("09:00", "10:00");
        let request = form
            .submit_on(
                &ctx,
                today(),
                || order.borrow_mut().push("success"),
                || order.borrow_mut().push("close"),
            )
            .await
            .unwrap();

        assert_eq!(request.status(), ReservationStatus::Pending);
        assert_eq!(order.into_inner(), vec!["success", "close"]);

        let rows = backend.rows("reservations");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        let expected_start = local_instant(tomorrow(), TimeSlot::parse("09:00").unwrap()).unwrap();
        let expected_end = local_instant(tomorrow(), TimeSlot::parse("10:00").unwrap()).unwrap();
        assert_eq!(row["start_time"], iso_millis::format(&expected_start));
        assert_eq!(row["end_time"], iso_millis::format(&expected_end));
        assert_eq!(row["status"], "pending");
        assert!(row["notes"].is_null());
        assert_eq!(row["user_id"], session.user_id.to_string());

        let note = notifier.last().unwrap();
        assert_eq!(note.title, "Reservation Created");
        assert!(!note.is_error());
    }

    #[tokio::test]
    async fn test_reversed_range_never_reaches_backend() {
        let backend = MemoryTableClient::new();
        let notifier = RecordingNotifier::new();
        let session = Session::new(Uuid::new_v4(), "t");
        let ctx = SubmitContext {
            backend: &backend,
            session: Some(&session),
            notifier: &notifier,
        };

        let called = Cell::new(false);
        let mut form = filled_form("10:00", "09:00");
        let result = form
            .submit_on(&ctx, today(), || called.set(true), || called.set(true))
            .await;

        assert!(matches!(
            result,
            Err(BookingError::Validation(ValidationError::InvalidTimeRange))
        ));
        assert!(!called.get());
        assert!(backend.calls().is_empty());

        let note = notifier.last().unwrap();
        assert!(note.is_error());
        assert_eq!(note.title, "Invalid Time Range");
        assert_eq!(note.description, "End time must be after start time.");
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_form_open() {
        let backend = MemoryTableClient::new();
        backend.fail(TableOp::Insert, "reservations");
        let notifier = RecordingNotifier::new();
        let session = Session::new(Uuid::new_v4(), "t");
        let ctx = SubmitContext {
            backend: &backend,
            session: Some(&session),
            notifier: &notifier,
        };

        let mut closed = false;
        let mut form = filled_form("13:00", "15:00");
        form.set_notes("Guest lecture");
        let before = form.clone();

        let result = form.submit_on(&ctx, today(), || {}, || closed = true).await;

        assert!(matches!(result, Err(BookingError::Backend(_))));
        assert!(!closed);
        assert_eq!(form, before);
        assert_eq!(backend.count(TableOp::Insert), 1);

        let note = notifier.last().unwrap();
        assert!(note.is_error());
        assert_eq!(note.description, "Failed to create reservation. Please try again.");
    }
}
